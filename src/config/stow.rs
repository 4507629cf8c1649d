//! The stow-package list (`stow.json`): an ordered list of directory names,
//! each resolved relative to the repository root.
use std::path::Path;

use anyhow::{Context as _, Result};

/// Load the stow-package list.
///
/// A missing file yields an empty list (nothing to stow).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading stow list {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing stow list {}", path.display()))
}
