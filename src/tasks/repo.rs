//! Repository bookkeeping: submodules, LFS content, remote URL.
use anyhow::{Context as _, Result};

use super::{Task, TaskResult};
use crate::context::Context;
use crate::error::ProvisionError;
use crate::pathscope::PathScope;

/// Bring the dotfiles repository itself up to date: initialize submodules,
/// pull large files, and normalize the origin URL for SSH pushes.
pub struct SyncRepository;

impl Task for SyncRepository {
    fn name(&self) -> &str {
        "Sync repository"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.root.join(".git").exists()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let _scope = PathScope::enter(&ctx.config.root)?;

        ctx.log.debug("initializing git submodules");
        ctx.executor
            .run("git", &["submodule", "update", "--init", "--recursive"])
            .context("updating git submodules")?;

        let lfs_probe = ctx
            .executor
            .run_unchecked("git", &["lfs", "version"])
            .context("probing for git-lfs")?;
        if !lfs_probe.success {
            return Err(ProvisionError::ToolNotFound("git-lfs".to_string()).into());
        }
        ctx.log.debug("pulling LFS files");
        ctx.executor
            .run("git", &["lfs", "pull"])
            .context("pulling LFS files")?;

        if let Some(origin) = &ctx.config.origin_url {
            ctx.log.debug(&format!("setting origin to {origin}"));
            ctx.executor
                .run("git", &["remote", "set-url", "origin", origin])
                .context("setting origin URL")?;
        }

        Ok(TaskResult::Ok)
    }
}
