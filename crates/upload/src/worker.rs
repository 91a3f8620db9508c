//! Single-chunk transfer.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use vaultml_transfer::{ChunkDescriptor, ChunkResult, ChunkSource};

use crate::error::{TransferFailure, UploadError};
use crate::remote::RemoteStore;

/// Immutable per-session values shared by every chunk transfer.
pub(crate) struct ChunkContext<'a> {
    pub store: &'a dyn RemoteStore,
    pub model: &'a str,
    pub version: &'a str,
    pub source: &'a ChunkSource,
    pub cancel: &'a CancellationToken,
    pub timeout: Option<Duration>,
    /// Ordinal of the final planned chunk; only it may be confirmed short.
    pub last_ordinal: u32,
}

/// Uploads one chunk.
///
/// Returns `Ok(None)` without touching the network when the session was
/// cancelled before the request went out.
pub(crate) async fn transfer_chunk(
    ctx: &ChunkContext<'_>,
    chunk: &ChunkDescriptor,
) -> Result<Option<ChunkResult>, UploadError> {
    send_chunk(ctx, chunk)
        .await
        .map_err(|source| UploadError::Transfer {
            ordinal: chunk.ordinal,
            source,
        })
}

async fn send_chunk(
    ctx: &ChunkContext<'_>,
    chunk: &ChunkDescriptor,
) -> Result<Option<ChunkResult>, TransferFailure> {
    let data = ctx.source.read(chunk).await?;

    if ctx.cancel.is_cancelled() {
        debug!(chunk = chunk.ordinal, "skipping chunk, upload cancelled");
        return Ok(None);
    }

    debug!(chunk = chunk.ordinal, bytes = data.len(), "sending chunk");
    let request = ctx
        .store
        .upload_chunk(ctx.model, ctx.version, chunk.ordinal, data);
    let response = match ctx.timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .map_err(|_| TransferFailure::Timeout(limit))??,
        None => request.await?,
    };

    let expected = chunk.size();
    if response.size != expected && chunk.ordinal != ctx.last_ordinal {
        return Err(TransferFailure::SizeMismatch {
            expected,
            confirmed: response.size,
        });
    }

    debug!(chunk = chunk.ordinal, confirmed = response.size, "chunk confirmed");
    Ok(Some(ChunkResult {
        ordinal: chunk.ordinal,
        size: response.size,
    }))
}
