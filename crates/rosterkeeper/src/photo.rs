//! Profile photo encoding.
//!
//! Photos travel inline as `data:` URIs. The empty string is the
//! placeholder marker meaning "no photo uploaded"; a failed read is
//! recovered by the caller substituting the placeholder, never by
//! aborting the save.

use std::path::Path;

use base64::Engine as _;
use tracing::debug;

use crate::error::{Error, Result};

/// The sentinel value meaning "no photo uploaded".
pub const PLACEHOLDER: &str = "";

/// Whether a photo field holds the placeholder marker.
#[must_use]
pub fn is_placeholder(photo: &str) -> bool {
    photo.is_empty()
}

/// Read an image file into a self-describing `data:` URI.
///
/// The read suspends until complete; the MIME type is guessed from the
/// file extension, falling back to `application/octet-stream`.
///
/// # Errors
///
/// Returns [`Error::PhotoRead`] if the file cannot be read. Callers decide
/// the placeholder fallback.
pub async fn read_to_data_uri(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| Error::PhotoRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
    debug!(path = %path.display(), bytes = bytes.len(), %mime, "Encoded photo");

    Ok(format!("data:{mime};base64,{payload}"))
}
