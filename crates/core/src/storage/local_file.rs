//! Local attachment file references
//!
//! Attachments are referenced by `file://` URIs. Anything else (remote
//! URLs, OS content providers) is never touched.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

use crate::{Error, Result};

pub const LOCAL_FILE_SCHEME: &str = "file://";

/// Whether `uri` uses the local-file scheme
pub fn is_local_file(uri: &str) -> bool {
    uri.starts_with(LOCAL_FILE_SCHEME)
}

/// Filesystem path behind a local-file reference
pub fn local_file_path(uri: &str) -> Option<PathBuf> {
    if !is_local_file(uri) {
        return None;
    }
    Url::parse(uri).ok()?.to_file_path().ok()
}

/// Local-file reference for an absolute path
pub fn file_uri(path: &Path) -> Result<String> {
    Url::from_file_path(path)
        .map(|url| url.to_string())
        .map_err(|_| Error::InvalidInput(format!("Not an absolute path: {}", path.display())))
}

/// Whether a local-file reference points at an existing file
pub async fn local_file_exists(uri: &str) -> bool {
    match local_file_path(uri) {
        Some(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
        None => false,
    }
}

/// Best-effort removal of an attachment file.
///
/// Non-local references and missing files are skipped; any other failure
/// is logged and swallowed.
pub async fn delete_local_file(uri: &str) {
    if !is_local_file(uri) {
        debug!("Skipping delete of non-local media {}", uri);
        return;
    }

    let Some(path) = local_file_path(uri) else {
        warn!("Failed to delete media file {}: not a usable file path", uri);
        return;
    };

    match tokio::fs::remove_file(&path).await {
        Ok(()) => debug!("Deleted media file {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Media file {} already absent", path.display());
        }
        Err(e) => warn!("Failed to delete media file {}: {}", path.display(), e),
    }
}
