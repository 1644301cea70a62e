//! Change-stream adapter: maps store mutation notifications onto change
//! events and reports per-item delivery failures back to the trigger.
//!
//! Each upstream record carries an operation kind, a change payload, and
//! an event id. The event id becomes the change event's sole resource
//! and is the correlation key the trigger uses to redeliver exactly the
//! failed items.

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::services::{StreamError, StreamService};
use crate::types::{ChangeEvent, DetailType, FailedEvent};

/// Source tag stamped on every change event this adapter constructs.
pub const EVENT_SOURCE: &str = "catalog";

/// A batch of upstream mutation notifications.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StreamRecord>,
}

/// One upstream mutation notification.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamRecord {
    /// Opaque identifier issued by the notification system.
    #[serde(rename = "eventID")]
    pub event_id: String,
    /// Operation kind: INSERT, MODIFY, or REMOVE.
    #[serde(rename = "eventName")]
    pub event_name: String,
    /// The change payload, passed through opaquely.
    #[serde(rename = "dynamodb", default)]
    pub change: serde_json::Value,
}

/// Failure report returned to the trigger, listing the items to
/// redeliver.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    pub batch_item_failures: Vec<BatchItemFailure>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    pub item_identifier: String,
}

/// A record that could not be mapped to a change event.
///
/// Mapping failures are per-record: the record lands in the failure
/// report and the rest of the batch proceeds.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("unrecognized operation kind '{0}'")]
    UnknownOperation(String),

    #[error("change payload is not serializable")]
    Payload(#[source] serde_json::Error),
}

/// Map one upstream record to a change event.
pub fn change_event_from_record(record: &StreamRecord) -> Result<ChangeEvent, MappingError> {
    let detail_type = match record.event_name.as_str() {
        "INSERT" => DetailType::Created,
        "MODIFY" => DetailType::Updated,
        "REMOVE" => DetailType::Deleted,
        other => return Err(MappingError::UnknownOperation(other.to_string())),
    };

    let detail = serde_json::to_string(&record.change).map_err(MappingError::Payload)?;

    Ok(ChangeEvent {
        source: EVENT_SOURCE.to_string(),
        detail,
        detail_type,
        resources: vec![record.event_id.clone()],
    })
}

/// Handles change-stream batches against the stream service.
pub struct StreamHandler {
    stream: StreamService,
}

impl StreamHandler {
    pub fn new(stream: StreamService) -> Self {
        Self { stream }
    }

    /// Process one notification batch.
    ///
    /// Records that fail mapping go straight into the failure report;
    /// the remaining events are published and any per-item delivery
    /// failures join them. A hard publish error propagates after the
    /// batches already delivered are accounted for.
    pub async fn handle(&self, event: StreamEvent) -> Result<StreamResponse, StreamError> {
        let mut failures = Vec::new();
        let mut events = Vec::with_capacity(event.records.len());

        for record in &event.records {
            match change_event_from_record(record) {
                Ok(change_event) => events.push(change_event),
                Err(e) => {
                    warn!(
                        event_id = %record.event_id,
                        error = %e,
                        "Record could not be mapped, reporting for redelivery"
                    );
                    failures.push(BatchItemFailure {
                        item_identifier: record.event_id.clone(),
                    });
                }
            }
        }

        let failed_events = self.stream.publish(&events).await.inspect_err(|e| {
            error!(error = %e, "Publish run aborted");
        })?;

        failures.extend(failed_events.iter().map(item_failure));

        Ok(StreamResponse {
            batch_item_failures: failures,
        })
    }
}

fn item_failure(failed: &FailedEvent) -> BatchItemFailure {
    BatchItemFailure {
        // Exactly one resource id per event by construction.
        item_identifier: failed.event.resources.first().cloned().unwrap_or_default(),
    }
}

/// Parse a raw notification body.
pub fn parse_stream_event(body: &[u8]) -> Result<StreamEvent, serde_json::Error> {
    serde_json::from_slice(body)
}
