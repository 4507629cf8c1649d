//! Named provisioning steps driven in a fixed sequence by the orchestrator.
pub mod browser;
pub mod credentials;
pub mod dotfiles;
pub mod ides;
pub mod repo;
pub mod settings;
pub mod software;

use anyhow::Result;

use crate::context::Context;
use crate::logging::TaskStatus;

/// Outcome of a successfully completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task did its work.
    Ok,
    /// Task had nothing to do, with a reason for the summary.
    Skipped(String),
}

/// A named, executable provisioning step.
pub trait Task {
    /// Human-readable task name, used for banners and the summary.
    fn name(&self) -> &str;

    /// Whether this task applies to the current system and configuration.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails; the orchestrator aborts the run
    /// on the first error.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete install sequence, in execution order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(software::InstallSoftware),
        Box::new(repo::SyncRepository),
        Box::new(dotfiles::StowDotfiles),
        Box::new(credentials::SyncCredentials),
        Box::new(ides::InstallIdes),
        Box::new(browser::ConfigureBrowsers),
        Box::new(settings::LoadDesktopSettings),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// A failing task is recorded and its error returned so the orchestrator
/// stops the run; there is no partial-success continuation.
///
/// # Errors
///
/// Propagates the task's error, annotated with the task name.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e.context(format!("task '{}' failed", task.name())))
        }
    }
}
