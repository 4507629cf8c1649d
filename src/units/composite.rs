//! The full software composite: system, desktop, pip.
use anyhow::Result;

use crate::config::manifest::Manifest;
use crate::context::Context;
use crate::platform::{DesktopSet, PackageManagerKind};
use crate::units::desktop::DesktopUnit;
use crate::units::pip::PipPackages;
use crate::units::system::SystemPackages;

/// Owns one [`SystemPackages`], one [`DesktopUnit`] and one [`PipPackages`]
/// and installs them in that fixed order.
#[derive(Debug)]
pub struct CompositeUnit {
    system: SystemPackages,
    desktop: DesktopUnit,
    pip: PipPackages,
}

impl CompositeUnit {
    /// Build the composite from the manifest, the selected package manager
    /// and the detected desktop environments.
    #[must_use]
    pub fn from_manifest(
        manifest: &Manifest,
        manager: PackageManagerKind,
        desktops: DesktopSet,
    ) -> Self {
        Self {
            system: SystemPackages::from_lists(&manifest.system, manager),
            desktop: DesktopUnit::from_manifest(&manifest.desktop, desktops, manager),
            pip: PipPackages::new(manifest.pip.clone()),
        }
    }

    /// Install system, then desktop, then pip packages; the first failure
    /// short-circuits the remaining units.
    ///
    /// # Errors
    ///
    /// Propagates the first unit failure.
    pub fn install(&self, ctx: &Context) -> Result<()> {
        self.system.install(ctx)?;
        self.desktop.install(ctx)?;
        self.pip.install(ctx)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::manifest;
    use crate::context::test_helpers::{empty_config, make_context};
    use crate::exec::test_helpers::RecordingExecutor;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn empty_manifest_installs_as_a_noop() {
        let executor = Arc::new(RecordingExecutor::new());
        let ctx = make_context(empty_config(PathBuf::from("/repo")), executor.clone());
        let unit = CompositeUnit::from_manifest(
            &Manifest::default(),
            PackageManagerKind::Apt,
            DesktopSet::default(),
        );
        unit.install(&ctx).unwrap();
        assert!(
            executor.recorded_calls().is_empty(),
            "empty package lists at every level must not invoke anything"
        );
    }

    #[test]
    fn manifest_lists_for_the_other_family_are_ignored() {
        // Only dnf is discoverable; the apt list must not leak into the run.
        let manifest = manifest::parse(
            r#"{"system": {"pkg": ["git"], "apt": ["apt-only-pkg"], "dnf": ["dnf-only-pkg"]}}"#,
        )
        .unwrap();
        let executor = Arc::new(RecordingExecutor::new());
        let mut ctx = make_context(empty_config(PathBuf::from("/repo")), executor.clone());
        ctx.manager = PackageManagerKind::Dnf;

        CompositeUnit::from_manifest(&manifest, PackageManagerKind::Dnf, DesktopSet::default())
            .install(&ctx)
            .unwrap();

        let calls = executor.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.contains(&"dnf-only-pkg".to_string()));
        assert!(!calls[0].1.contains(&"apt-only-pkg".to_string()));
    }

    /// End-to-end scenario: `{"system": {"pkg": ["git"]}, "pip": ["wheel"]}`
    /// with `dnf` present and no desktop environment. Expected external
    /// invocations are exactly: one `dnf install -y git`, one pip bootstrap,
    /// one pip install of `wheel`; no desktop-related calls.
    #[test]
    fn minimal_manifest_issues_exactly_three_calls() {
        let manifest =
            manifest::parse(r#"{"system": {"pkg": ["git"]}, "pip": ["wheel"]}"#).unwrap();
        let executor = Arc::new(RecordingExecutor::new().with_which("dnf"));
        let mut ctx = make_context(empty_config(PathBuf::from("/repo")), executor.clone());
        ctx.manager = PackageManagerKind::Dnf;

        CompositeUnit::from_manifest(&manifest, PackageManagerKind::Dnf, DesktopSet::default())
            .install(&ctx)
            .unwrap();

        let calls = executor.recorded_calls();
        assert_eq!(calls.len(), 3, "expected exactly three external calls");

        let (prog, args) = &calls[0];
        assert_eq!(prog, "sudo");
        assert_eq!(args[..], ["dnf", "install", "-y", "git"]);

        assert_eq!(calls[1].0, "python3");
        assert_eq!(calls[1].1, ["-m", "pip", "install", "wheel", "setuptools"]);

        assert_eq!(calls[2].0, "python3");
        assert_eq!(calls[2].1, ["-m", "pip", "install", "wheel"]);
    }
}
