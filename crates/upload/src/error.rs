//! Upload error types.

use std::time::Duration;

use vaultml_protocol::UploadState;

/// Errors talking to the registry.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid access token")]
    InvalidToken,
}

/// Why a single chunk did not make it.
#[derive(Debug, thiserror::Error)]
pub enum TransferFailure {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("cannot read chunk: {0}")]
    Source(#[from] vaultml_transfer::TransferError),

    #[error("server confirmed {confirmed} bytes, expected {expected}")]
    SizeMismatch { expected: u64, confirmed: u64 },

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors produced by a chunked upload session.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid upload options: {0}")]
    InvalidOptions(String),

    #[error("cannot {action} upload in state {state}")]
    InvalidState {
        action: &'static str,
        state: UploadState,
    },

    #[error("failed to initiate upload: {0}")]
    Initiate(#[source] RemoteError),

    #[error("failed to upload chunk {ordinal}: {source}")]
    Transfer {
        ordinal: u32,
        #[source]
        source: TransferFailure,
    },

    #[error("failed to complete upload: {0}")]
    Complete(#[source] RemoteError),

    #[error("abort notification failed: {0}")]
    AbortNotification(#[source] RemoteError),

    #[error("upload aborted")]
    Aborted,
}

impl UploadError {
    /// Ordinal of the failed chunk, if this is a chunk failure.
    pub fn chunk_ordinal(&self) -> Option<u32> {
        match self {
            Self::Transfer { ordinal, .. } => Some(*ordinal),
            _ => None,
        }
    }
}
