//! The credential-attachment list (`credentials.json`): attachments to
//! export from the KeePassXC vault into the filesystem.
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

/// One attachment to export from the vault.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialAttachment {
    /// Entry path inside the database (e.g., `Tech/Server/Backup`).
    pub entry: String,
    /// Attachment name on that entry (e.g., `id_backup`).
    pub name: String,
    /// Destination path; a directory gets the attachment name appended.
    pub dest: String,
}

/// Load the credential-attachment list.
///
/// A missing file yields an empty list (nothing to export).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<CredentialAttachment>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading credential list {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing credential list {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(
            &path,
            r#"[{"entry": "Tech/GitHub", "name": "id_github", "dest": "~/.ssh"}]"#,
        )
        .unwrap();
        let attachments = load(&path).unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].entry, "Tech/GitHub");
        assert_eq!(attachments[0].name, "id_github");
        assert_eq!(attachments[0].dest, "~/.ssh");
    }

    #[test]
    fn missing_file_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("credentials.json")).unwrap().is_empty());
    }
}
