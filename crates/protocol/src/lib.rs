//! Wire types for the VaultML chunked upload protocol.
//!
//! The registry exposes four endpoints per upload session (initiate, upload
//! chunk, complete, abort). This crate holds their request/response bodies,
//! the path builders, and the client-side lifecycle and progress types that
//! are handed to callers.

pub mod endpoints;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use messages::{ChunkUploadResponse, InitiateRequest, InitiateResponse};
pub use types::{ProgressSnapshot, UploadState};

/// Content type sent when the caller does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Multipart form field carrying a chunk's bytes.
pub const CHUNK_FIELD: &str = "chunk";
