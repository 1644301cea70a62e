//! Stream service: hands change events to the bus and reports failures.

use std::sync::Arc;

use tracing::warn;

use crate::bus::{BatchPublishError, EventBus};
use crate::types::{ChangeEvent, FailedEvent};

/// A publish run that could not complete.
#[derive(Debug, thiserror::Error)]
#[error("failed to publish change events")]
pub struct StreamError {
    #[source]
    pub source: BatchPublishError,
}

impl StreamError {
    /// Per-item failures collected before the run aborted.
    pub fn failed_before_abort(&self) -> &[FailedEvent] {
        &self.source.failed
    }
}

/// Thin orchestrator between change-event producers and the bus.
///
/// No retry logic lives here: redelivery of failed items belongs to the
/// upstream trigger.
pub struct StreamService {
    bus: Arc<dyn EventBus>,
}

impl StreamService {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }

    /// Publish events, returning the per-item failures for the caller to
    /// report. A hard error wraps the aborted run with context.
    pub async fn publish(
        &self,
        events: &[ChangeEvent],
    ) -> Result<Vec<FailedEvent>, StreamError> {
        let failed = self
            .bus
            .publish(events)
            .await
            .map_err(|source| StreamError { source })?;

        if !failed.is_empty() {
            warn!(failed = failed.len(), total = events.len(), "Some change events were rejected");
        }

        Ok(failed)
    }
}
