//! The `install` command: the full provisioning sequence.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::context::Context;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform::{self, DesktopSet};
use crate::tasks;

/// Run the install command.
///
/// Drives every provisioning step in order; the first unrecoverable error
/// from any step aborts the run.
///
/// # Errors
///
/// Returns an error if root discovery, configuration loading, platform
/// probing, or any provisioning step fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>, executor: Arc<dyn Executor>) -> Result<()> {
    let root = resolve_root(global, executor.as_ref())?;

    let version = option_env!("PROVISION_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("provision {version}"));

    log.stage("Loading configuration");
    let config = Config::load(&root, global)?;
    log.info(&format!(
        "{} stow packages, {} IDEs",
        config.stow_packages.len(),
        config.ides.len()
    ));

    log.stage("Probing platform");
    let manager = platform::detect_package_manager(executor.as_ref())?;
    let desktops = DesktopSet::detect();
    log.info(&format!(
        "package manager: {manager}, GNOME: {}, KDE: {}",
        desktops.contains(platform::DesktopEnvironment::Gnome),
        desktops.contains(platform::DesktopEnvironment::Kde),
    ));

    let ctx = Context::new(config, manager, desktops, Arc::clone(log), executor)?;

    for task in tasks::all_install_tasks() {
        tasks::execute(task.as_ref(), &ctx)?;
    }

    ctx.log.print_summary();
    Ok(())
}

/// Resolve the repository root from `--root` or a version-control query.
///
/// # Errors
///
/// Returns an error if no override is given and the current directory is
/// not inside a git work tree.
pub fn resolve_root(global: &GlobalOpts, executor: &dyn Executor) -> Result<PathBuf> {
    if let Some(root) = &global.root {
        return Ok(root.clone());
    }

    let result = executor
        .run("git", &["rev-parse", "--show-toplevel"])
        .context("discovering the repository root (use --root to override)")?;
    Ok(PathBuf::from(result.stdout.trim()))
}
