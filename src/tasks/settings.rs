//! Load the dconf settings dump into the desktop settings database.
use anyhow::{Context as _, Result};

use super::{Task, TaskResult};
use crate::context::Context;
use crate::error::ProvisionError;

/// Pipe the configured keyfile dump verbatim into `dconf load -f /`.
pub struct LoadDesktopSettings;

impl Task for LoadDesktopSettings {
    fn name(&self) -> &str {
        "Load desktop settings"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.gsettings_path.is_file()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if !ctx.executor.which("dconf") {
            return Err(ProvisionError::ToolNotFound("dconf".to_string()).into());
        }

        let path = &ctx.config.gsettings_path;
        let settings = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        ctx.log
            .info(&format!("loading dconf settings from {}", path.display()));
        ctx.executor
            .run_with_input("dconf", &["load", "-f", "/"], &settings)
            .context("loading dconf settings")?;
        Ok(TaskResult::Ok)
    }
}
