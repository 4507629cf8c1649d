//! Stow each configured dotfile package into the home directory.
use anyhow::Result;

use super::{Task, TaskResult};
use crate::context::Context;
use crate::units::{InstallUnit, StowTarget};

/// Mirror every package from the stow list into `$HOME` via symlinks.
pub struct StowDotfiles;

impl Task for StowDotfiles {
    fn name(&self) -> &str {
        "Stow dotfiles"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.stow_packages.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        for package in &ctx.config.stow_packages {
            ctx.log.info(&format!("stowing {package}"));
            let unit = InstallUnit::Stow(StowTarget::new(
                ctx.config.stow_package_dir(package),
                ctx.home.clone(),
            ));
            unit.install(ctx)?;
        }
        ctx.log
            .info(&format!("{} packages stowed", ctx.config.stow_packages.len()));
        Ok(TaskResult::Ok)
    }
}
