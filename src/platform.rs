//! Platform probing: package-manager family, desktop environments, privilege.
use std::fmt;

use crate::error::ProvisionError;
use crate::exec::Executor;

/// Supported system package-manager families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManagerKind {
    /// Debian-family systems (apt).
    Apt,
    /// RHEL-family systems (dnf).
    Dnf,
}

impl PackageManagerKind {
    /// The executable name used to invoke this package manager.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
        }
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Select the package manager for this run from executable presence.
///
/// Detection is evidence-based, not configuration-based: whichever family's
/// executable is on `$PATH` wins, with `apt` preferred when both are present.
///
/// # Errors
///
/// Returns [`ProvisionError::NoPackageManager`] if neither executable exists.
pub fn detect_package_manager(
    executor: &dyn Executor,
) -> Result<PackageManagerKind, ProvisionError> {
    if executor.which("apt") {
        Ok(PackageManagerKind::Apt)
    } else if executor.which("dnf") {
        Ok(PackageManagerKind::Dnf)
    } else {
        Err(ProvisionError::NoPackageManager)
    }
}

/// A desktop environment the engine knows how to extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopEnvironment {
    Gnome,
    Kde,
}

/// The set of desktop environments active in this session.
///
/// GNOME and KDE are not mutually exclusive; a session may report both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DesktopSet {
    gnome: bool,
    kde: bool,
}

impl DesktopSet {
    /// Detect active desktop environments from `XDG_CURRENT_DESKTOP`.
    ///
    /// An unset variable yields the empty set, which is valid: no
    /// desktop-specific units install.
    #[must_use]
    pub fn detect() -> Self {
        Self::parse(&std::env::var("XDG_CURRENT_DESKTOP").unwrap_or_default())
    }

    /// Parse a `:`-separated `XDG_CURRENT_DESKTOP` value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut set = Self::default();
        for token in value.split(':') {
            match token {
                "GNOME" => set.gnome = true,
                "KDE" => set.kde = true,
                _ => {}
            }
        }
        set
    }

    /// Build a set from explicit flags (for testing and construction).
    #[must_use]
    pub const fn new(gnome: bool, kde: bool) -> Self {
        Self { gnome, kde }
    }

    #[must_use]
    pub const fn contains(self, de: DesktopEnvironment) -> bool {
        match de {
            DesktopEnvironment::Gnome => self.gnome,
            DesktopEnvironment::Kde => self.kde,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.gnome && !self.kde
    }
}

/// Whether the effective user is the superuser.
#[must_use]
pub fn is_superuser() -> bool {
    nix::unistd::Uid::effective().is_root()
}
