//! Fixed-size batching with per-item failure aggregation.
//!
//! Bus backends cap how many events one delivery call may carry. This
//! module slices an ordered event sequence into contiguous chunks, calls
//! a delivery function per chunk, and aggregates the per-item failures
//! each call reports. A hard error short-circuits: batches not yet
//! attempted are never reported as failed.

use std::future::Future;

use super::BusError;
use crate::types::{ChangeEvent, FailedEvent};

/// A publish run aborted by a hard error.
///
/// Carries the per-item failures collected from the batches delivered
/// before the abort, so the caller can still action them individually.
#[derive(Debug, thiserror::Error)]
#[error("publish aborted after {attempted} of {total} batches: {source}")]
pub struct BatchPublishError {
    /// Failures reported by batches delivered before the abort.
    pub failed: Vec<FailedEvent>,
    /// Number of batches attempted, including the one that errored.
    pub attempted: usize,
    /// Total number of batches the input would have produced.
    pub total: usize,
    #[source]
    pub source: BusError,
}

/// Publish `events` in order through `publish_fn`, at most
/// `max_batch_size` per call.
///
/// Chunks are contiguous, non-overlapping, and cover the input exactly
/// once; the last chunk may be smaller. Per-item failures are collected
/// across chunks. A hard error from `publish_fn` stops the run and
/// returns the failures collected so far alongside it. Empty input makes
/// no calls and returns no failures.
pub async fn publish_batched<F, Fut>(
    events: &[ChangeEvent],
    max_batch_size: usize,
    mut publish_fn: F,
) -> Result<Vec<FailedEvent>, BatchPublishError>
where
    F: FnMut(Vec<ChangeEvent>) -> Fut,
    Fut: Future<Output = Result<Vec<FailedEvent>, BusError>>,
{
    // A zero batch size cannot make progress; deliver one at a time.
    let max_batch_size = max_batch_size.max(1);
    let total = events.len().div_ceil(max_batch_size);

    let mut failed = Vec::new();

    for (i, chunk) in events.chunks(max_batch_size).enumerate() {
        match publish_fn(chunk.to_vec()).await {
            Ok(chunk_failures) => failed.extend(chunk_failures),
            Err(source) => {
                return Err(BatchPublishError {
                    failed,
                    attempted: i + 1,
                    total,
                    source,
                })
            }
        }
    }

    Ok(failed)
}
