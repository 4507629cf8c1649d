//! The IDE-descriptor list (`ides.json`).
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Deserialize;

use crate::fsutil;

/// One IDE to install.
///
/// `name` is the short name used inside the archive (e.g., `idea`); the
/// archive at `url` is expected to contain `bin/<name>` and `bin/<name>.svg`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdeSpec {
    pub name: String,
    /// Canonical name (e.g., "IntelliJ IDEA"). Defaults to the capitalized
    /// short name.
    #[serde(default)]
    pub long_name: Option<String>,
    /// Link to the tar archive. Assumed to be installed already if absent.
    #[serde(default)]
    pub url: Option<String>,
    /// Install-root override; defaults to `~/.local/opt/jetbrains/<name>`.
    #[serde(default)]
    pub ide_home: Option<String>,
    /// Whether an existing install root may be replaced when a URL is given.
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub mime_types: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl IdeSpec {
    /// The display name: `long_name` or the capitalized short name.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.long_name
            .clone()
            .unwrap_or_else(|| capitalize(&self.name))
    }

    /// The resolved install root for this IDE.
    #[must_use]
    pub fn install_root(&self, home: &Path) -> PathBuf {
        self.ide_home.as_ref().map_or_else(
            || home.join(".local/opt/jetbrains").join(&self.name),
            |p| fsutil::expand_tilde(p, home),
        )
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

/// Load the IDE-descriptor list.
///
/// A missing file yields an empty list (no IDEs configured).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<IdeSpec>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading IDE list {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing IDE list {}", path.display()))
}
