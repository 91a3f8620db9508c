use std::time::Instant;

use vaultml_protocol::ProgressSnapshot;

use crate::ChunkResult;

/// Recomputes progress from every confirmed chunk so far.
///
/// `results` is in confirmation order; the last entry is reported as the
/// current part.
pub fn compute_progress(
    results: &[ChunkResult],
    total_bytes: u64,
    started_at: Instant,
    total_parts: u32,
) -> ProgressSnapshot {
    compute_progress_at(results, total_bytes, started_at, total_parts, Instant::now())
}

/// Same as [`compute_progress`] with an explicit clock reading.
pub fn compute_progress_at(
    results: &[ChunkResult],
    total_bytes: u64,
    started_at: Instant,
    total_parts: u32,
    now: Instant,
) -> ProgressSnapshot {
    let uploaded_bytes: u64 = results.iter().map(|r| r.size).sum();

    let percentage = if total_bytes == 0 {
        0.0
    } else {
        (uploaded_bytes as f64 / total_bytes as f64 * 100.0).min(100.0)
    };

    let elapsed = now.saturating_duration_since(started_at).as_secs_f64();
    let speed = if elapsed > 0.0 {
        uploaded_bytes as f64 / elapsed
    } else {
        0.0
    };

    let remaining_bytes = total_bytes as f64 - uploaded_bytes as f64;
    let remaining_time = remaining_bytes / speed;
    // Covers speed == 0 (inf / NaN) and an over-acknowledged final chunk.
    let remaining_time = if remaining_time.is_finite() && remaining_time > 0.0 {
        remaining_time
    } else {
        0.0
    };

    ProgressSnapshot {
        uploaded_bytes,
        total_bytes,
        percentage,
        current_part: results.last().map_or(0, |r| r.ordinal),
        total_parts,
        speed,
        remaining_time,
    }
}
