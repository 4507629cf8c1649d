//! Install everything the package manifest names.
use anyhow::Result;

use super::{Task, TaskResult};
use crate::context::Context;
use crate::units::{CompositeUnit, InstallUnit};

/// Build the composite install unit from the manifest and run it.
pub struct InstallSoftware;

impl Task for InstallSoftware {
    fn name(&self) -> &str {
        "Install software"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        // An entirely empty manifest is still a valid (no-op) install.
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let unit = InstallUnit::Composite(CompositeUnit::from_manifest(
            &ctx.config.manifest,
            ctx.manager,
            ctx.desktops,
        ));
        ctx.log.debug(&format!("installing {}", unit.description()));
        unit.install(ctx)?;
        Ok(TaskResult::Ok)
    }
}
