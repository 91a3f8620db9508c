use crate::TransferError;

/// One planned unit of transfer: bytes `[start, end)` of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDescriptor {
    /// 1-based position in the plan.
    pub ordinal: u32,
    pub start: u64,
    pub end: u64,
}

impl ChunkDescriptor {
    /// Size of this chunk in bytes.
    pub fn size(&self) -> u64 {
        self.end - self.start
    }
}

/// A chunk the remote side has confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkResult {
    pub ordinal: u32,
    /// Size acknowledged by the server, not the size we sliced.
    pub size: u64,
}

/// Number of chunks needed for `total_len` bytes: `ceil(total_len / chunk_size)`.
pub fn chunk_count(total_len: u64, chunk_size: u64) -> Result<u32, TransferError> {
    if chunk_size == 0 {
        return Err(TransferError::ZeroChunkSize);
    }
    let n = total_len.div_ceil(chunk_size);
    u32::try_from(n).map_err(|_| TransferError::TooManyChunks(n))
}

/// Splits `total_len` bytes into consecutive chunks of `chunk_size` bytes.
///
/// The last chunk is clamped to `total_len`; every other chunk is exactly
/// `chunk_size` long. An empty source produces an empty plan.
pub fn plan_chunks(total_len: u64, chunk_size: u64) -> Result<Vec<ChunkDescriptor>, TransferError> {
    let count = chunk_count(total_len, chunk_size)?;
    let plan = (0..count)
        .map(|i| {
            let start = u64::from(i) * chunk_size;
            ChunkDescriptor {
                ordinal: i + 1,
                start,
                end: (start + chunk_size).min(total_len),
            }
        })
        .collect();
    Ok(plan)
}
