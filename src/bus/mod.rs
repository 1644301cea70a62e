//! Event bus for change delivery.
//!
//! This module contains:
//! - `EventBus` trait: batched delivery of change events to an external
//!   bus, reporting per-item failures without failing the call
//! - `publish_batched`: the fixed-size batching algorithm
//! - Implementations: EventBridge (feature `eventbridge`), Mock

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::BusConfig;
use crate::types::{ChangeEvent, FailedEvent};

pub mod batch;
pub mod mock;

#[cfg(feature = "eventbridge")]
pub mod eventbridge;

pub use batch::{publish_batched, BatchPublishError};
pub use mock::MockEventBus;

#[cfg(feature = "eventbridge")]
pub use eventbridge::{EventBridgeBus, EventBridgeConfig};

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors that can occur during a single delivery call.
///
/// These are hard errors: the whole batch attempt failed and none of its
/// events can be assumed delivered. Per-item rejections are not errors;
/// they surface as `FailedEvent` entries instead.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("publish call failed: {0}")]
    Publish(String),
}

/// Interface for delivering change events to an external bus.
///
/// Implementations batch internally at their configured maximum batch
/// size. Events rejected individually by the bus come back as
/// `FailedEvent` entries carrying the original event; a hard error
/// aborts the remaining batches and is returned as `BatchPublishError`
/// together with the failures collected before the abort.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish events, in order, in fixed-size batches.
    async fn publish(
        &self,
        events: &[ChangeEvent],
    ) -> std::result::Result<Vec<FailedEvent>, BatchPublishError>;
}

/// Initialize the event bus based on configuration.
///
/// Returns the `EventBus` implementation selected by the configured bus
/// type. EventBridge requires the `eventbridge` feature.
pub async fn init_event_bus(
    config: &BusConfig,
) -> std::result::Result<Arc<dyn EventBus>, Box<dyn std::error::Error + Send + Sync>> {
    match config.bus_type.as_str() {
        "mock" => {
            info!(bus_type = "mock", "Event bus initialized");
            Ok(Arc::new(MockEventBus::new()))
        }
        #[cfg(feature = "eventbridge")]
        "eventbridge" => {
            let mut bridge_config = EventBridgeConfig::new(&config.name)
                .with_max_batch_size(config.max_batch_size);
            if let Some(ref endpoint) = config.endpoint_url {
                bridge_config = bridge_config.with_endpoint(endpoint);
            }
            let bus = EventBridgeBus::new(bridge_config).await?;
            info!(bus_type = "eventbridge", bus_name = %config.name, "Event bus initialized");
            Ok(Arc::new(bus))
        }
        #[cfg(not(feature = "eventbridge"))]
        "eventbridge" => Err(
            "EventBridge support requires the 'eventbridge' feature. Rebuild with --features eventbridge"
                .into(),
        ),
        other => Err(format!("Unknown bus type: {}", other).into()),
    }
}
