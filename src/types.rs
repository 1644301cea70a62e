//! Value objects shared across the catalog and stream paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// One page of catalog items.
///
/// `next` is present iff more items exist beyond this page. The token is
/// opaque: callers round-trip it verbatim into the next list call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRange {
    pub products: Vec<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Kind of mutation a change event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailType {
    Created,
    Updated,
    Deleted,
}

impl DetailType {
    /// Wire rendering used as the event's detail-type tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailType::Created => "ProductCreated",
            DetailType::Updated => "ProductUpdated",
            DetailType::Deleted => "ProductDeleted",
        }
    }
}

impl fmt::Display for DetailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification describing one store mutation, destined for the bus.
///
/// Immutable once constructed; one per source mutation. `resources`
/// holds the upstream event identifier used to correlate delivery
/// failures back to the trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub source: String,
    pub detail: String,
    pub detail_type: DetailType,
    pub resources: Vec<String>,
}

/// A change event annotated with why its individual delivery failed.
///
/// Produced only at the bus boundary; never persisted. Carries the
/// original event so the caller can action it individually.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedEvent {
    pub event: ChangeEvent,
    pub failure_code: String,
    pub failure_message: String,
}
