//! Resource URI normalization.
//!
//! `file://` URLs become local paths; local absolute paths are canonicalized
//! and must exist. Anything else is passed through as-is.

use std::path::Path;

use url::Url;

/// Why a URI could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// `file:` URL that does not name a local path.
    NotALocalPath,
    /// Local path that does not exist or cannot be resolved.
    Unresolvable,
}

/// Normalize `uri` for storage.
pub fn normalize(uri: &str) -> Result<String, UriError> {
    if uri.starts_with("file:") {
        let url = Url::parse(uri).map_err(|_| UriError::NotALocalPath)?;
        let path = url.to_file_path().map_err(|()| UriError::NotALocalPath)?;
        return canonical_path(&path);
    }
    if uri.starts_with('/') {
        return canonical_path(Path::new(uri));
    }
    Ok(uri.to_string())
}

fn canonical_path(path: &Path) -> Result<String, UriError> {
    let resolved = std::fs::canonicalize(path).map_err(|_| UriError::Unresolvable)?;
    resolved
        .to_str()
        .map(str::to_string)
        .ok_or(UriError::Unresolvable)
}
