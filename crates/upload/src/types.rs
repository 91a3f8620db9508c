//! Caller-facing upload options.

use std::fmt;
use std::time::Duration;

use vaultml_protocol::{DEFAULT_CONTENT_TYPE, ProgressSnapshot};
use vaultml_transfer::{ChunkSource, DEFAULT_CHUNK_SIZE};

use crate::error::UploadError;

/// Default number of chunks in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Called after every confirmed chunk.
pub type ProgressCallback = Box<dyn Fn(ProgressSnapshot) + Send + Sync>;
/// Called at most once per session when the upload fails.
pub type ErrorCallback = Box<dyn Fn(&UploadError) + Send + Sync>;
/// Called once with the registry's completion payload.
pub type CompleteCallback = Box<dyn Fn(&serde_json::Value) + Send + Sync>;

/// Everything a [`ChunkedUpload`](crate::ChunkedUpload) needs to run.
pub struct UploadOptions {
    pub model_name: String,
    pub filename: String,
    pub source: ChunkSource,
    pub content_type: String,
    pub chunk_size: u64,
    pub concurrency: usize,
    /// Per-chunk deadline; `None` waits indefinitely.
    pub chunk_timeout: Option<Duration>,
    pub on_progress: Option<ProgressCallback>,
    pub on_error: Option<ErrorCallback>,
    pub on_complete: Option<CompleteCallback>,
}

impl UploadOptions {
    pub fn new(
        model_name: impl Into<String>,
        filename: impl Into<String>,
        source: ChunkSource,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            filename: filename.into(),
            source,
            content_type: DEFAULT_CONTENT_TYPE.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            chunk_timeout: None,
            on_progress: None,
            on_error: None,
            on_complete: None,
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn chunk_timeout(mut self, timeout: Duration) -> Self {
        self.chunk_timeout = Some(timeout);
        self
    }

    pub fn on_progress(mut self, f: impl Fn(ProgressSnapshot) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&UploadError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl Fn(&serde_json::Value) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Rejects options no session could run with.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.model_name.trim().is_empty() {
            return Err(UploadError::InvalidOptions("model name is empty".into()));
        }
        if self.chunk_size == 0 {
            return Err(UploadError::InvalidOptions(
                "chunk size must be greater than zero".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(UploadError::InvalidOptions(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.chunk_timeout.is_some_and(|t| t.is_zero()) {
            return Err(UploadError::InvalidOptions(
                "chunk timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("model_name", &self.model_name)
            .field("filename", &self.filename)
            .field("source_len", &self.source.len())
            .field("content_type", &self.content_type)
            .field("chunk_size", &self.chunk_size)
            .field("concurrency", &self.concurrency)
            .field("chunk_timeout", &self.chunk_timeout)
            .finish_non_exhaustive()
    }
}
