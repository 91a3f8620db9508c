//! Seam between the orchestrator and the registry.
//!
//! [`HttpStore`](crate::HttpStore) is the production implementation; tests
//! drive the orchestrator through scripted stores.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use vaultml_protocol::{ChunkUploadResponse, InitiateRequest, InitiateResponse};

use crate::error::RemoteError;

/// Boxed future returned by [`RemoteStore`] calls.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// The four registry endpoints a chunked upload uses.
pub trait RemoteStore: Send + Sync {
    /// Opens a session and returns its token.
    fn initiate<'a>(
        &'a self,
        model: &'a str,
        request: &'a InitiateRequest,
    ) -> RemoteFuture<'a, InitiateResponse>;

    /// Stores one chunk. Exactly one network write per call.
    fn upload_chunk<'a>(
        &'a self,
        model: &'a str,
        version: &'a str,
        ordinal: u32,
        data: Bytes,
    ) -> RemoteFuture<'a, ChunkUploadResponse>;

    /// Finalizes the session. The payload is handed to the caller untouched.
    fn complete<'a>(&'a self, model: &'a str, version: &'a str)
    -> RemoteFuture<'a, serde_json::Value>;

    /// Releases server-side state for the session.
    fn abort<'a>(&'a self, model: &'a str, version: &'a str) -> RemoteFuture<'a, ()>;
}
