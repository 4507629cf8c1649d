//! Integration tests for the conflict-aware symlink-farm installer.
mod common;

use common::{RecordingExecutor, TestContextBuilder, make_run_context};
use provision_cli::tasks::{self, Task};
use provision_cli::units::StowTarget;
use std::sync::Arc;

/// A plain file at the target path is removed by the pre-pass; a symlink
/// and a missing path are left alone.
#[test]
fn pre_pass_removes_only_true_conflicts() {
    let ctx = TestContextBuilder::new()
        .with_stow_file("bash", "dot-bashrc", "managed")
        .with_stow_file("bash", "dot-profile", "managed")
        .with_stow_file("bash", "dot-inputrc", "managed")
        .build();
    let root = ctx.root_path();
    let home = root.join("home");
    std::fs::create_dir_all(&home).unwrap();

    // dot-bashrc: plain file → conflict. dot-profile: symlink → keep.
    // dot-inputrc: absent → nothing to do.
    std::fs::write(home.join("dot-bashrc"), "user edit").unwrap();
    std::os::unix::fs::symlink(root.join("bash/dot-profile"), home.join("dot-profile")).unwrap();

    let stow = StowTarget::new(root.join("bash"), home.clone());
    let conflicts = stow.find_conflicts().unwrap();
    assert_eq!(conflicts, vec![home.join("dot-bashrc")]);

    let executor = Arc::new(RecordingExecutor::new().with_which("stow"));
    let run_ctx = make_run_context(ctx.load_config(), executor.clone(), home.clone());
    stow.install(&run_ctx).unwrap();

    assert!(!home.join("dot-bashrc").exists(), "conflict must be deleted");
    assert!(
        home.join("dot-profile").is_symlink(),
        "existing symlink must be untouched"
    );
    assert_eq!(executor.recorded_calls().len(), 1, "one stow invocation");
}

/// Re-running the installer over an unmodified, already-linked tree
/// schedules no deletions on the second run.
#[test]
fn second_run_is_conflict_free() {
    let ctx = TestContextBuilder::new()
        .with_stow_file("bash", "dot-bashrc", "managed")
        .with_stow_file("bash", "config/app.conf", "managed")
        .build();
    let root = ctx.root_path();
    let home = root.join("home");
    std::fs::create_dir_all(home.join("config")).unwrap();

    // Simulate the state after a successful first run: every target is a
    // symlink into the package tree.
    std::os::unix::fs::symlink(root.join("bash/dot-bashrc"), home.join("dot-bashrc")).unwrap();
    std::os::unix::fs::symlink(
        root.join("bash/config/app.conf"),
        home.join("config/app.conf"),
    )
    .unwrap();

    let stow = StowTarget::new(root.join("bash"), home);
    assert!(
        stow.find_conflicts().unwrap().is_empty(),
        "second run must not delete anything"
    );
}

/// The stow task processes every configured package and surfaces the stow
/// tool requirement.
#[test]
fn stow_task_requires_the_stow_tool() {
    let ctx = TestContextBuilder::new()
        .with_asset("stow.json", r#"["bash"]"#)
        .with_stow_file("bash", "dot-bashrc", "managed")
        .build();
    let root = ctx.root_path();
    let home = root.join("home");
    std::fs::create_dir_all(&home).unwrap();

    let executor = Arc::new(RecordingExecutor::new()); // no stow on PATH
    let run_ctx = make_run_context(ctx.load_config(), executor, home);

    let task = tasks::dotfiles::StowDotfiles;
    assert!(task.should_run(&run_ctx));
    let err = task.run(&run_ctx).unwrap_err();
    assert!(err.chain().any(|c| c.to_string().contains("stow")));
}
