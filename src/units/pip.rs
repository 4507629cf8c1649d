//! Pip package installation.
use anyhow::{Context as _, Result};

use crate::context::Context;
use crate::error::ProvisionError;

/// Baseline build tooling installed before the requested set.
const BOOTSTRAP_PACKAGES: &[&str] = &["wheel", "setuptools"];

/// An immutable, ordered set of pip package names.
#[derive(Debug, Clone)]
pub struct PipPackages {
    packages: Vec<String>,
}

impl PipPackages {
    #[must_use]
    pub const fn new(packages: Vec<String>) -> Self {
        Self { packages }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    #[must_use]
    pub fn description(&self) -> String {
        format!("{} packages (pip)", self.packages.len())
    }

    /// Install the packages via pip.
    ///
    /// Precondition: must not run as the superuser — pip packages belong to
    /// the user's home, and a root-owned site-packages tree is a recurring
    /// source of broken environments.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::PrivilegedPipInstall`] when running as the
    /// superuser, or the underlying process error if a pip invocation fails.
    pub fn install(&self, ctx: &Context) -> Result<()> {
        if ctx.is_superuser {
            return Err(ProvisionError::PrivilegedPipInstall.into());
        }

        if self.packages.is_empty() {
            ctx.log.debug("no pip packages requested");
            return Ok(());
        }

        ctx.log.info(&format!(
            "installing {} pip packages",
            self.packages.len()
        ));

        let mut bootstrap = vec!["-m", "pip", "install"];
        bootstrap.extend(BOOTSTRAP_PACKAGES);
        ctx.executor
            .run("python3", &bootstrap)
            .context("bootstrapping pip build tooling")?;

        let mut args = vec!["-m", "pip", "install"];
        args.extend(self.packages.iter().map(String::as_str));
        ctx.executor
            .run("python3", &args)
            .context("installing pip packages")?;
        Ok(())
    }
}
