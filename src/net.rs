//! Remote artifact fetching.
use std::path::Path;

use crate::error::ProvisionError;

/// Download `url` into the file at `dest`, streaming the body to disk.
///
/// # Errors
///
/// Returns [`ProvisionError::Network`] if the request fails, the server
/// responds with an error status, or the body cannot be written to `dest`.
pub fn download(url: &str, dest: &Path) -> Result<(), ProvisionError> {
    let network = |reason: String| ProvisionError::Network {
        url: url.to_string(),
        reason,
    };

    tracing::debug!("downloading {url} to {}", dest.display());

    let mut response = ureq::get(url).call().map_err(|e| network(e.to_string()))?;
    let mut file = std::fs::File::create(dest)
        .map_err(|e| network(format!("creating {}: {e}", dest.display())))?;
    std::io::copy(&mut response.body_mut().as_reader(), &mut file)
        .map_err(|e| network(format!("writing {}: {e}", dest.display())))?;
    Ok(())
}
