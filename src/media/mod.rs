//! Media encoding for analysis uploads.
//!
//! Turns a user-selected file (or an uploaded byte buffer) into the
//! transport form the provider expects: a base64 payload with its media
//! type, plus a `data:` URI usable as a preview. No validation of type or
//! size is performed; any content is forwarded as-is.

use std::path::{Path, PathBuf};

use base64::Engine;
use thiserror::Error;
use tracing::debug;

/// Media type used when neither the name nor the content identifies the file.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Where the media to analyze comes from.
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// A file on the local filesystem.
    File(PathBuf),
    /// Bytes uploaded by a client along with the type it declared.
    Upload { bytes: Vec<u8>, mime_type: String },
}

/// Base64 payload ready to be attached to a provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMedia {
    /// Declared media type of the source.
    pub mime_type: String,
    /// Standard-alphabet base64 of the raw bytes.
    pub data: String,
}

impl EncodedMedia {
    /// `data:` URI for displaying the media back to the user.
    pub fn preview_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Size of the decoded payload in bytes.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

/// Errors that can occur while encoding media.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Media is empty: {0}")]
    Empty(String),
}

/// Encode media from any source.
pub async fn encode(source: MediaSource) -> Result<EncodedMedia, MediaError> {
    match source {
        MediaSource::File(path) => encode_file(&path).await,
        MediaSource::Upload { bytes, mime_type } => encode_bytes(&bytes, &mime_type),
    }
}

/// Read a file and encode it, taking the media type from its name.
pub async fn encode_file(path: &Path) -> Result<EncodedMedia, MediaError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| MediaError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        return Err(MediaError::Empty(path.display().to_string()));
    }

    let mime_type = mime_type_for_path(path, &bytes);
    debug!(
        "Encoded {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime_type
    );

    Ok(EncodedMedia {
        data: base64::engine::general_purpose::STANDARD.encode(&bytes),
        mime_type,
    })
}

/// Encode an uploaded buffer, keeping the type the client declared.
///
/// A missing or generic declared type is replaced by the sniffed one.
pub fn encode_bytes(bytes: &[u8], declared_type: &str) -> Result<EncodedMedia, MediaError> {
    if bytes.is_empty() {
        return Err(MediaError::Empty("upload".to_string()));
    }

    let declared = declared_type.trim();
    let mime_type = if declared.is_empty() || declared == FALLBACK_MIME_TYPE {
        sniff_mime_type(bytes)
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string()
    } else {
        declared.to_string()
    };

    Ok(EncodedMedia {
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
        mime_type,
    })
}

/// Media type from the file extension, then from content, then the fallback.
fn mime_type_for_path(path: &Path, bytes: &[u8]) -> String {
    if let Some(guess) = mime_guess::from_path(path).first() {
        return guess.essence_str().to_string();
    }
    sniff_mime_type(bytes)
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}
