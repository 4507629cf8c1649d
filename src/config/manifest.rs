//! The package manifest (`packages.json`).
//!
//! Structure:
//!
//! ```json
//! {
//!   "system": { "pkg": [...], "apt": [...], "dnf": [...] },
//!   "desktop": {
//!     "gnome": { "pkg": [...], "extensions": ["https://..."] },
//!     "kde":   { "pkg": [...], "extensions": { "plasmoid": ["https://..."] } }
//!   },
//!   "pip": [...]
//! }
//! ```
//!
//! Every list value is an ordered sequence of strings. Missing keys default
//! to empty; unknown keys are ignored.
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

/// Package names keyed by manager family.
///
/// `pkg` entries apply under either family; `apt`/`dnf` entries only under
/// the matching one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageLists {
    #[serde(default)]
    pub pkg: Vec<String>,
    #[serde(default)]
    pub apt: Vec<String>,
    #[serde(default)]
    pub dnf: Vec<String>,
}

impl PackageLists {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pkg.is_empty() && self.apt.is_empty() && self.dnf.is_empty()
    }
}

/// GNOME slice of the manifest: packages plus extension archive URLs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GnomeSpec {
    #[serde(flatten)]
    pub packages: PackageLists,
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// KDE slice of the manifest: packages plus extension archive URLs keyed by
/// extension type (`kwinscript`, `effect`, `plasmoid`, …).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KdeSpec {
    #[serde(flatten)]
    pub packages: PackageLists,
    #[serde(default)]
    pub extensions: BTreeMap<String, Vec<String>>,
}

/// Desktop-environment slices of the manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesktopSection {
    #[serde(default)]
    pub gnome: GnomeSpec,
    #[serde(default)]
    pub kde: KdeSpec,
}

/// The full package manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub system: PackageLists,
    #[serde(default)]
    pub desktop: DesktopSection,
    #[serde(default)]
    pub pip: Vec<String>,
}

/// Load the manifest from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;
    parse(&content).with_context(|| format!("parsing manifest {}", path.display()))
}

/// Parse manifest JSON from a string.
///
/// # Errors
///
/// Returns an error if the content is not valid JSON for the manifest schema.
pub fn parse(content: &str) -> Result<Manifest> {
    Ok(serde_json::from_str(content)?)
}
