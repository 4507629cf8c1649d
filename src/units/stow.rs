//! Conflict-aware symlink-farm installation.
//!
//! `stow` fails outright when a destination file already exists and is not a
//! link, which would force manual cleanup before every re-provisioning run.
//! The conflict pre-pass removes exactly those files — and nothing else —
//! before delegating the link pass to the external tool.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use walkdir::WalkDir;

use crate::context::Context;
use crate::error::ProvisionError;
use crate::pathscope::PathScope;

/// A (package source directory, target directory) pair; immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct StowTarget {
    package_dir: PathBuf,
    target_dir: PathBuf,
}

impl StowTarget {
    #[must_use]
    pub const fn new(package_dir: PathBuf, target_dir: PathBuf) -> Self {
        Self {
            package_dir,
            target_dir,
        }
    }

    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "stow {} into {}",
            self.package_dir.display(),
            self.target_dir.display()
        )
    }

    /// Mirror the package directory into the target directory via symlinks.
    ///
    /// Runs the conflict pre-pass, then delegates to `stow` with
    /// `--no-folding` (each file gets its own link, never a linked parent
    /// directory) and `--dotfiles` (a literal `dot-` prefix marks files
    /// meant to appear as hidden files at the target).
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::ToolNotFound`] if `stow` is absent, or the
    /// underlying error if conflict removal or the link pass fails.
    pub fn install(&self, ctx: &Context) -> Result<()> {
        if !ctx.executor.which("stow") {
            return Err(ProvisionError::ToolNotFound("stow".to_string()).into());
        }

        for conflict in self.find_conflicts()? {
            ctx.log.warn(&format!("unlinking {}", conflict.display()));
            std::fs::remove_file(&conflict)
                .with_context(|| format!("removing conflicting file {}", conflict.display()))?;
        }

        let parent = self
            .package_dir
            .parent()
            .with_context(|| format!("package {} has no parent", self.package_dir.display()))?;
        let name = self
            .package_dir
            .file_name()
            .with_context(|| format!("package {} has no name", self.package_dir.display()))?
            .to_string_lossy()
            .into_owned();
        let target = self.target_dir.display().to_string();

        let _scope = PathScope::enter(parent)?;
        ctx.executor
            .run(
                "stow",
                &["--no-folding", "--dotfiles", "--target", &target, &name],
            )
            .with_context(|| format!("stowing {name}"))?;
        Ok(())
    }

    /// Walk every file under the package directory and collect the target
    /// paths that would block the link pass.
    ///
    /// A conflict exists iff the corresponding target path exists, is a
    /// regular file, is not itself a symlink, and canonicalizes to its own
    /// literal path. The last condition excludes files that are reachable
    /// only through an already-linked ancestor directory — those are not
    /// conflicts, they are the managed link.
    ///
    /// # Errors
    ///
    /// Returns an error if the package tree cannot be walked.
    pub fn find_conflicts(&self) -> Result<Vec<PathBuf>> {
        let mut conflicts = Vec::new();
        for entry in WalkDir::new(&self.package_dir) {
            let entry = entry
                .with_context(|| format!("walking {}", self.package_dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.package_dir)
                .with_context(|| format!("relativizing {}", entry.path().display()))?;
            let target = self.target_dir.join(relative);
            if is_blocking_conflict(&target) {
                conflicts.push(target);
            }
        }
        Ok(conflicts)
    }
}

/// The conflict predicate; see [`StowTarget::find_conflicts`].
///
/// The canonicalization equality is a narrow heuristic for "not merely
/// visible through a linked ancestor"; it is kept exactly as-is on purpose.
fn is_blocking_conflict(target: &Path) -> bool {
    let is_symlink = target
        .symlink_metadata()
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    target.exists()
        && target.is_file()
        && !is_symlink
        && target.canonicalize().is_ok_and(|resolved| resolved == *target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_helpers::{empty_config, make_context};
    use crate::exec::test_helpers::{MockExecutor, RecordingExecutor};
    use std::sync::Arc;

    /// Canonicalized tempdir, so the canonicalization-equality predicate
    /// compares like with like.
    fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().canonicalize().unwrap();
        (dir, path)
    }

    #[test]
    fn plain_file_target_is_a_conflict() {
        let (_guard, root) = canonical_tempdir();
        let package = root.join("pkg");
        let target = root.join("home");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(package.join("dot-bashrc"), "source").unwrap();
        std::fs::write(target.join("dot-bashrc"), "old content").unwrap();

        let conflicts = StowTarget::new(package, target.clone())
            .find_conflicts()
            .unwrap();
        assert_eq!(conflicts, vec![target.join("dot-bashrc")]);
    }

    #[test]
    fn symlink_target_is_not_a_conflict() {
        let (_guard, root) = canonical_tempdir();
        let package = root.join("pkg");
        let target = root.join("home");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(package.join("bashrc"), "source").unwrap();
        std::os::unix::fs::symlink(package.join("bashrc"), target.join("bashrc")).unwrap();

        let conflicts = StowTarget::new(package, target).find_conflicts().unwrap();
        assert!(conflicts.is_empty(), "symlinks must be left untouched");
    }

    #[test]
    fn missing_target_is_not_a_conflict() {
        let (_guard, root) = canonical_tempdir();
        let package = root.join("pkg");
        let target = root.join("home");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(package.join("bashrc"), "source").unwrap();

        let conflicts = StowTarget::new(package, target).find_conflicts().unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn file_behind_linked_ancestor_is_not_a_conflict() {
        // target/.config is a symlink to the package's config directory, so
        // target/.config/app.conf resolves elsewhere: already the managed
        // link, not a conflict.
        let (_guard, root) = canonical_tempdir();
        let package = root.join("pkg");
        let target = root.join("home");
        std::fs::create_dir_all(package.join(".config")).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(package.join(".config/app.conf"), "source").unwrap();
        std::os::unix::fs::symlink(package.join(".config"), target.join(".config")).unwrap();

        let conflicts = StowTarget::new(package, target).find_conflicts().unwrap();
        assert!(
            conflicts.is_empty(),
            "files visible only through a linked directory are not conflicts"
        );
    }

    #[test]
    fn nested_plain_file_is_a_conflict() {
        let (_guard, root) = canonical_tempdir();
        let package = root.join("pkg");
        let target = root.join("home");
        std::fs::create_dir_all(package.join(".config/app")).unwrap();
        std::fs::create_dir_all(target.join(".config/app")).unwrap();
        std::fs::write(package.join(".config/app/settings"), "source").unwrap();
        std::fs::write(target.join(".config/app/settings"), "stale").unwrap();

        let conflicts = StowTarget::new(package, target.clone())
            .find_conflicts()
            .unwrap();
        assert_eq!(conflicts, vec![target.join(".config/app/settings")]);
    }

    #[test]
    fn second_run_over_linked_tree_finds_nothing() {
        // After a successful stow run the targets are symlinks, so a repeat
        // pre-pass must not schedule any deletions.
        let (_guard, root) = canonical_tempdir();
        let package = root.join("pkg");
        let target = root.join("home");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        for name in ["bashrc", "profile"] {
            std::fs::write(package.join(name), "source").unwrap();
            std::os::unix::fs::symlink(package.join(name), target.join(name)).unwrap();
        }

        let stow = StowTarget::new(package, target);
        assert!(stow.find_conflicts().unwrap().is_empty());
    }

    #[test]
    fn install_fails_without_stow_on_path() {
        let (_guard, root) = canonical_tempdir();
        let package = root.join("pkg");
        std::fs::create_dir_all(&package).unwrap();

        let executor = Arc::new(MockExecutor::default());
        let ctx = make_context(empty_config(root.clone()), executor);
        let err = StowTarget::new(package, root.join("home"))
            .install(&ctx)
            .unwrap_err();
        assert!(
            err.downcast_ref::<ProvisionError>()
                .is_some_and(|e| matches!(e, ProvisionError::ToolNotFound(tool) if tool == "stow")),
            "expected ToolNotFound(stow), got: {err}"
        );
    }

    #[test]
    fn install_removes_conflicts_and_invokes_stow() {
        let _lock = crate::pathscope::CWD_TEST_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let (_guard, root) = canonical_tempdir();
        let package = root.join("pkg");
        let target = root.join("home");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(package.join("bashrc"), "source").unwrap();
        std::fs::write(target.join("bashrc"), "stale").unwrap();

        let executor = Arc::new(RecordingExecutor::new().with_which("stow"));
        let ctx = make_context(empty_config(root.clone()), executor.clone());
        StowTarget::new(package, target.clone())
            .install(&ctx)
            .unwrap();

        assert!(
            !target.join("bashrc").exists(),
            "conflicting plain file must be removed before linking"
        );

        let calls = executor.recorded_calls();
        assert_eq!(calls.len(), 1);
        let (prog, args) = &calls[0];
        assert_eq!(prog, "stow");
        assert_eq!(
            args[..4],
            [
                "--no-folding",
                "--dotfiles",
                "--target",
                target.to_str().unwrap()
            ]
        );
        assert_eq!(args[4], "pkg");
    }
}
