//! Mock event bus implementation for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{publish_batched, BatchPublishError, BusError, EventBus};
use crate::types::{ChangeEvent, FailedEvent};

/// Mock event bus for testing.
///
/// Records everything published. Failures are injectable two ways:
/// whole-call failures (`set_fail_on_publish`) become hard errors, and
/// per-event rejections (`reject_resource`) become `FailedEvent`
/// entries, keyed by the event's first resource id.
#[derive(Default)]
pub struct MockEventBus {
    published: RwLock<Vec<ChangeEvent>>,
    fail_on_publish: RwLock<bool>,
    rejected_resources: RwLock<Vec<String>>,
    max_batch_size: usize,
}

impl MockEventBus {
    pub fn new() -> Self {
        Self {
            max_batch_size: 10,
            ..Self::default()
        }
    }

    /// Make the next publish calls fail wholesale.
    pub async fn set_fail_on_publish(&self, fail: bool) {
        *self.fail_on_publish.write().await = fail;
    }

    /// Reject events whose first resource id matches, without failing
    /// the call.
    pub async fn reject_resource(&self, resource: impl Into<String>) {
        self.rejected_resources.write().await.push(resource.into());
    }

    pub async fn published_count(&self) -> usize {
        self.published.read().await.len()
    }

    pub async fn take_published(&self) -> Vec<ChangeEvent> {
        std::mem::take(&mut *self.published.write().await)
    }
}

#[async_trait]
impl EventBus for MockEventBus {
    async fn publish(
        &self,
        events: &[ChangeEvent],
    ) -> Result<Vec<FailedEvent>, BatchPublishError> {
        publish_batched(events, self.max_batch_size, |chunk| async move {
            if *self.fail_on_publish.read().await {
                return Err(BusError::Publish("mock publish failure".to_string()));
            }

            let rejected = self.rejected_resources.read().await;
            let mut failed = Vec::new();
            for event in chunk {
                let is_rejected = event
                    .resources
                    .first()
                    .is_some_and(|r| rejected.contains(r));
                if is_rejected {
                    failed.push(FailedEvent {
                        event,
                        failure_code: "MockRejection".to_string(),
                        failure_message: "rejected by mock bus".to_string(),
                    });
                } else {
                    self.published.write().await.push(event);
                }
            }

            Ok(failed)
        })
        .await
    }
}
