//! Minimal INI key-value parser (used for Firefox's `profiles.ini`).
use std::path::Path;

use anyhow::{Context as _, Result, bail};

/// A key-value section where the header is a data key.
///
/// Headers preserve original case since they carry semantic meaning
/// (e.g., `[Profile0]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvSection {
    /// The raw section header (e.g., `"Profile0"`).
    pub header: String,
    /// Key-value entries within this section.
    pub entries: Vec<(String, String)>,
}

impl KvSection {
    /// Look up the first value for `key` in this section.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse an INI file into key-value sections.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn parse_kv_sections(path: &Path) -> Result<Vec<KvSection>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_kv_sections_from_str(&content)
}

/// Parse key-value INI content from a string.
///
/// Format:
/// ```ini
/// [Profile0]
/// Name=default-release
/// Path=abcd1234.default-release
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - A key-value pair is malformed (missing `=`)
/// - An entry appears outside of a section header
pub fn parse_kv_sections_from_str(content: &str) -> Result<Vec<KvSection>> {
    let mut sections = Vec::new();
    let mut current: Option<KvSection> = None;

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if let Some(header) = parse_raw_header(trimmed) {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(KvSection {
                header,
                entries: Vec::new(),
            });
        } else if let Some(ref mut section) = current {
            if let Some((key, value)) = parse_kv_line(trimmed) {
                section.entries.push((key, value));
            } else {
                bail!(
                    "invalid key-value pair at line {}: {}",
                    line_num + 1,
                    trimmed
                );
            }
        } else {
            bail!(
                "entry outside of section at line {}: {}",
                line_num + 1,
                trimmed
            );
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }

    Ok(sections)
}

/// Parse a `[header]` line preserving original case.
fn parse_raw_header(line: &str) -> Option<String> {
    let inner = line.trim().strip_prefix('[')?.strip_suffix(']')?;
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Parse a `key = value` line.
fn parse_kv_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}
