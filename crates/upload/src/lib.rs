//! Chunked model upload to a VaultML registry.
//!
//! A [`ChunkedUpload`] opens an upload session on the registry, sends the
//! source in fixed-size chunks with bounded parallelism, reports progress
//! after every confirmed chunk, and finalizes the session. Any failure or a
//! call to [`ChunkedUpload::abort`] releases the server-side session.
//!
//! The registry is reached through the [`RemoteStore`] trait;
//! [`HttpStore`] is the `reqwest` implementation.

pub mod error;
pub mod http;
pub mod orchestrator;
pub mod remote;
pub mod types;
mod worker;

#[cfg(test)]
mod testing;

pub use error::{RemoteError, TransferFailure, UploadError};
pub use http::HttpStore;
pub use orchestrator::ChunkedUpload;
pub use remote::{RemoteFuture, RemoteStore};
pub use types::{
    CompleteCallback, DEFAULT_CONCURRENCY, ErrorCallback, ProgressCallback, UploadOptions,
};
