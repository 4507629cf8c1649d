//! Scoped, restorable working-directory change.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

/// RAII guard that changes the process working directory and restores the
/// previous one when dropped.
///
/// The restore runs on every exit path, including early returns and panics,
/// so callers never leave the process in a relocated directory. Entering the
/// directory the process is already in is a no-op both ways.
#[derive(Debug)]
pub struct PathScope {
    original: PathBuf,
    changed: bool,
}

impl PathScope {
    /// Change into `path`, remembering the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or `path`
    /// cannot be entered.
    pub fn enter(path: &Path) -> Result<Self> {
        let original = std::env::current_dir().context("reading current directory")?;
        let target = path
            .canonicalize()
            .with_context(|| format!("resolving {}", path.display()))?;
        let changed = original != target;
        if changed {
            tracing::debug!("switching path to {}", target.display());
            std::env::set_current_dir(&target)
                .with_context(|| format!("entering {}", target.display()))?;
        }
        Ok(Self { original, changed })
    }

    /// The directory that will be restored on drop.
    #[must_use]
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for PathScope {
    fn drop(&mut self) {
        if self.changed {
            tracing::debug!("restoring original path {}", self.original.display());
            // Nothing sensible to do with a failure during unwind.
            let _ = std::env::set_current_dir(&self.original);
        }
    }
}

/// Serializes working-directory manipulation across parallel test threads.
#[cfg(test)]
pub(crate) static CWD_TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
