//! Domain-specific error types for the provisioning engine.
//!
//! Failures with a distinct recovery story or exit message get a typed
//! variant here ([`thiserror`]); everything else travels as contextual
//! [`anyhow::Error`] and the two meet at the command boundary via `?`.

use std::path::PathBuf;

use thiserror::Error;

/// Failures the provisioning run distinguishes by kind.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Neither supported package-manager executable was found on `$PATH`.
    #[error("no supported package manager found (neither apt nor dnf is on PATH)")]
    NoPackageManager,

    /// A pip install was attempted while running as the superuser.
    #[error("refusing to install pip packages as the superuser")]
    PrivilegedPipInstall,

    /// A required external binary is absent from `$PATH`.
    #[error("required tool not found on PATH: {0}")]
    ToolNotFound(String),

    /// A remote artifact could not be fetched.
    #[error("download failed for {url}: {reason}")]
    Network {
        /// The URL that could not be fetched.
        url: String,
        /// Human-readable cause from the transport or filesystem.
        reason: String,
    },

    /// An IDE install root was expected to pre-exist and did not.
    #[error("install root {0} does not exist and no archive URL was given")]
    MissingInstallRoot(PathBuf),
}
