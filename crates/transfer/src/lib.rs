//! Chunked transfer building blocks.
//!
//! Planning a file into fixed-size chunks, reading a planned chunk back
//! from its source, and turning confirmed chunk results into progress.
//! Nothing here talks to the network.

mod format;
mod planner;
mod progress;
mod source;

pub use format::{format_duration, format_file_size, format_speed};
pub use planner::{ChunkDescriptor, ChunkResult, chunk_count, plan_chunks};
pub use progress::{compute_progress, compute_progress_at};
pub use source::ChunkSource;

/// Default chunk size: 100 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 100 * 1024 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("chunk {ordinal} range {start}..{end} exceeds source length {len}")]
    OutOfBounds {
        ordinal: u32,
        start: u64,
        end: u64,
        len: u64,
    },

    #[error("too many chunks: {0}")]
    TooManyChunks(u64),
}
