//! Shared context for one provisioning run.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform::{DesktopSet, PackageManagerKind};

/// Everything a provisioning step needs: configuration, the probed platform,
/// the logger, and the process executor.
///
/// Built once per run and immutable thereafter; steps only read from it.
pub struct Context {
    pub config: Config,
    /// Package manager selected for this run.
    pub manager: PackageManagerKind,
    /// Desktop environments active in this session.
    pub desktops: DesktopSet,
    pub log: Arc<Logger>,
    /// User's home directory (the stow target).
    pub home: PathBuf,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Whether the run is executing with superuser privileges.
    pub is_superuser: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("manager", &self.manager)
            .field("desktops", &self.desktops)
            .field("home", &self.home)
            .field("executor", &"<dyn Executor>")
            .field("is_superuser", &self.is_superuser)
            .finish()
    }
}

impl Context {
    /// Create a new run context.
    ///
    /// # Errors
    ///
    /// Returns an error if the HOME environment variable is not set.
    pub fn new(
        config: Config,
        manager: PackageManagerKind,
        desktops: DesktopSet,
        log: Arc<Logger>,
        executor: Arc<dyn Executor>,
    ) -> Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?;

        Ok(Self {
            config,
            manager,
            desktops,
            log,
            home: PathBuf::from(home),
            executor,
            is_superuser: crate::platform::is_superuser(),
        })
    }
}

/// Shared factories for unit tests.
#[cfg(test)]
pub(crate) mod test_helpers {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::Context;
    use crate::config::Config;
    use crate::config::manifest::Manifest;
    use crate::exec::Executor;
    use crate::logging::Logger;
    use crate::platform::{DesktopSet, PackageManagerKind};

    /// Build a [`Config`] with all lists empty and `root` set to `root`.
    pub fn empty_config(root: PathBuf) -> Config {
        let assets_dir = root.join("assets");
        Config {
            root,
            gsettings_path: assets_dir.join("gsettings.conf"),
            assets_dir,
            manifest: Manifest::default(),
            stow_packages: vec![],
            ides: vec![],
            credentials: vec![],
            origin_url: None,
        }
    }

    /// Build a [`Context`] from the given config and executor.
    ///
    /// Defaults: apt manager, no desktop environments, non-superuser,
    /// home at `/home/test`.
    pub fn make_context(config: Config, executor: Arc<dyn Executor>) -> Context {
        Context {
            config,
            manager: PackageManagerKind::Apt,
            desktops: DesktopSet::default(),
            log: Arc::new(Logger::new()),
            home: PathBuf::from("/home/test"),
            executor,
            is_superuser: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::{empty_config, make_context};
    use crate::exec::test_helpers::MockExecutor;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn debug_format_includes_key_fields() {
        let config = empty_config(PathBuf::from("/dotfiles"));
        let ctx = make_context(config, Arc::new(MockExecutor::default()));
        let debug = format!("{ctx:?}");
        assert!(debug.contains("Context"));
        assert!(debug.contains("manager"));
        assert!(debug.contains("home"));
    }

    #[test]
    fn test_context_defaults() {
        let config = empty_config(PathBuf::from("/dotfiles"));
        let ctx = make_context(config, Arc::new(MockExecutor::default()));
        assert!(!ctx.is_superuser);
        assert!(ctx.desktops.is_empty());
        assert_eq!(ctx.home, PathBuf::from("/home/test"));
        assert_eq!(ctx.config.root, PathBuf::from("/dotfiles"));
    }
}
