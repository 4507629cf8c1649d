//! The install-unit hierarchy: self-contained, idempotent installation steps.
//!
//! Each unit is constructed once from its manifest slice and immutable
//! thereafter. Idempotence is a property of the delegated external tools
//! (package managers and stow), not of the unit itself, so re-running a unit
//! is safe.
pub mod composite;
pub mod desktop;
pub mod pip;
pub mod stow;
pub mod system;

use anyhow::Result;

use crate::context::Context;

pub use composite::CompositeUnit;
pub use desktop::{DesktopUnit, ExtensionDescriptor};
pub use pip::PipPackages;
pub use stow::StowTarget;
pub use system::SystemPackages;

/// A single installation step, dispatched by kind.
///
/// The set of installation strategies is fixed and known at compile time,
/// so the capability is a closed sum type rather than an open trait.
#[derive(Debug)]
pub enum InstallUnit {
    /// Packages from the system repositories.
    System(SystemPackages),
    /// Packages installed via pip.
    Pip(PipPackages),
    /// Desktop-environment packages and downloaded extensions.
    Desktop(DesktopUnit),
    /// A dotfile package mirrored into a target directory via symlinks.
    Stow(StowTarget),
    /// The full composite: system, then desktop, then pip.
    Composite(CompositeUnit),
}

impl InstallUnit {
    /// Human-readable description of this unit.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::System(unit) => unit.description(),
            Self::Pip(unit) => unit.description(),
            Self::Desktop(_) => "desktop packages and extensions".to_string(),
            Self::Stow(unit) => unit.description(),
            Self::Composite(_) => "system, desktop and pip packages".to_string(),
        }
    }

    /// Install this unit.
    ///
    /// # Errors
    ///
    /// Propagates the first failure from the underlying installation
    /// strategy; no retries and no partial-success bookkeeping.
    pub fn install(&self, ctx: &Context) -> Result<()> {
        match self {
            Self::System(unit) => unit.install(ctx),
            Self::Pip(unit) => unit.install(ctx),
            Self::Desktop(unit) => unit.install(ctx),
            Self::Stow(unit) => unit.install(ctx),
            Self::Composite(unit) => unit.install(ctx),
        }
    }
}
