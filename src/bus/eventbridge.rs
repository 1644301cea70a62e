//! AWS EventBridge event bus implementation.
//!
//! Each change event becomes one PutEvents entry on the configured bus.
//! PutEvents accepts at most ten entries per call, so delivery goes
//! through `publish_batched`. The call reply carries one result entry
//! per request entry; entries without an event id were rejected
//! individually and come back as `FailedEvent`s.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_eventbridge::types::{PutEventsRequestEntry, PutEventsResultEntry};
use aws_sdk_eventbridge::Client;
use tracing::{debug, info};

use super::{publish_batched, BatchPublishError, BusError, EventBus, Result};
use crate::types::{ChangeEvent, FailedEvent};

/// PutEvents limit on entries per call.
const MAX_ENTRIES_PER_CALL: usize = 10;

/// Configuration for the EventBridge connection.
#[derive(Clone, Debug)]
pub struct EventBridgeConfig {
    /// Name of the event bus to publish to.
    pub bus_name: String,
    /// AWS region. Uses the default provider chain if not set.
    pub region: Option<String>,
    /// Custom endpoint URL (for LocalStack or testing).
    pub endpoint_url: Option<String>,
    /// Maximum entries per PutEvents call (default and cap: 10).
    pub max_batch_size: usize,
}

impl EventBridgeConfig {
    /// Create config for the named event bus.
    pub fn new(bus_name: impl Into<String>) -> Self {
        Self {
            bus_name: bus_name.into(),
            region: None,
            endpoint_url: None,
            max_batch_size: MAX_ENTRIES_PER_CALL,
        }
    }

    /// Set AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set custom endpoint URL (for LocalStack or testing).
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Set entries per call. Values above the PutEvents limit are capped.
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size.min(MAX_ENTRIES_PER_CALL);
        self
    }
}

/// AWS EventBridge implementation of `EventBus`.
pub struct EventBridgeBus {
    client: Client,
    config: EventBridgeConfig,
}

impl EventBridgeBus {
    /// Create a new EventBridge bus.
    pub async fn new(config: EventBridgeConfig) -> Result<Self> {
        let mut aws_config_builder = aws_config::defaults(BehaviorVersion::latest());

        if let Some(ref region) = config.region {
            aws_config_builder =
                aws_config_builder.region(aws_config::Region::new(region.clone()));
        }

        if let Some(ref endpoint) = config.endpoint_url {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);
        }

        let aws_config = aws_config_builder.load().await;
        let client = Client::new(&aws_config);

        info!(
            region = ?config.region,
            endpoint = ?config.endpoint_url,
            bus_name = %config.bus_name,
            "Connected to AWS EventBridge"
        );

        Ok(Self { client, config })
    }

    fn entry(&self, event: &ChangeEvent) -> PutEventsRequestEntry {
        PutEventsRequestEntry::builder()
            .event_bus_name(&self.config.bus_name)
            .source(&event.source)
            .detail(&event.detail)
            .detail_type(event.detail_type.as_str())
            .set_resources(Some(event.resources.clone()))
            .build()
    }
}

/// Partition a PutEvents reply into per-item failures.
///
/// Result entries line up with request entries by position. An entry
/// with an event id was accepted; one without was rejected and its
/// error code/message explain why.
fn failures_from_reply(events: &[ChangeEvent], entries: &[PutEventsResultEntry]) -> Vec<FailedEvent> {
    events
        .iter()
        .zip(entries)
        .filter(|(_, entry)| entry.event_id().is_none())
        .map(|(event, entry)| FailedEvent {
            event: event.clone(),
            failure_code: entry.error_code().unwrap_or("Unknown").to_string(),
            failure_message: entry.error_message().unwrap_or_default().to_string(),
        })
        .collect()
}

#[async_trait]
impl EventBus for EventBridgeBus {
    async fn publish(
        &self,
        events: &[ChangeEvent],
    ) -> std::result::Result<Vec<FailedEvent>, BatchPublishError> {
        publish_batched(events, self.config.max_batch_size, |chunk| async move {
            let entries: Vec<PutEventsRequestEntry> =
                chunk.iter().map(|event| self.entry(event)).collect();

            let result = self
                .client
                .put_events()
                .set_entries(Some(entries))
                .send()
                .await
                .map_err(|e| BusError::Publish(format!("EventBridge PutEvents failed: {}", e)))?;

            let failed = if result.failed_entry_count() > 0 {
                failures_from_reply(&chunk, result.entries())
            } else {
                Vec::new()
            };

            debug!(
                bus_name = %self.config.bus_name,
                entries = chunk.len(),
                failed = failed.len(),
                "Published change events to EventBridge"
            );

            Ok(failed)
        })
        .await
    }
}
