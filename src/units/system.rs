//! System-repository package installation.
use anyhow::{Context as _, Result};

use crate::config::manifest::PackageLists;
use crate::context::Context;
use crate::platform::PackageManagerKind;

/// An immutable, ordered set of package names resolved against the active
/// package manager.
#[derive(Debug, Clone)]
pub struct SystemPackages {
    packages: Vec<String>,
    manager: PackageManagerKind,
}

impl SystemPackages {
    /// Create a unit from an explicit package list.
    #[must_use]
    pub const fn new(packages: Vec<String>, manager: PackageManagerKind) -> Self {
        Self { packages, manager }
    }

    /// Resolve a manifest slice against the active package manager:
    /// the common `pkg` list plus the manager-specific list, in order.
    #[must_use]
    pub fn from_lists(lists: &PackageLists, manager: PackageManagerKind) -> Self {
        let mut packages = lists.pkg.clone();
        match manager {
            PackageManagerKind::Apt => packages.extend(lists.apt.iter().cloned()),
            PackageManagerKind::Dnf => packages.extend(lists.dnf.iter().cloned()),
        }
        Self { packages, manager }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    #[must_use]
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    #[must_use]
    pub fn description(&self) -> String {
        format!("{} packages ({})", self.packages.len(), self.manager)
    }

    /// Install the packages with the platform package manager in one
    /// non-interactive, auto-confirm invocation. No-op on an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the package-manager process fails; partial
    /// installs by the package manager itself are outside this unit's
    /// control, so the failure is propagated, not retried.
    pub fn install(&self, ctx: &Context) -> Result<()> {
        if self.packages.is_empty() {
            ctx.log.debug("no system packages requested");
            return Ok(());
        }

        ctx.log.info(&format!(
            "installing {} system packages via {}",
            self.packages.len(),
            self.manager
        ));

        let mut args = vec![self.manager.command(), "install", "-y"];
        args.extend(self.packages.iter().map(String::as_str));
        ctx.executor
            .run("sudo", &args)
            .with_context(|| format!("installing system packages via {}", self.manager))?;
        Ok(())
    }
}
