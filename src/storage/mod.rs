//! Catalog store implementations.
//!
//! This module contains:
//! - `CatalogStore` trait: the key-value capability the service layer
//!   talks to
//! - `MemoryCatalogStore`: in-memory map for local runs and tests
//! - `DynamoCatalogStore`: DynamoDB-backed store (feature `dynamo`)

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::StorageConfig;
use crate::types::{Product, ProductRange};

pub mod memory;

#[cfg(feature = "dynamo")]
pub mod dynamo;

pub use memory::MemoryCatalogStore;

#[cfg(feature = "dynamo")]
pub use dynamo::DynamoCatalogStore;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("store query failed: {0}")]
    Query(String),

    #[error("store write failed: {0}")]
    Write(String),

    #[error("stored item is malformed: {0}")]
    Corrupt(String),
}

/// Interface to the durable product catalog.
///
/// Pagination contract: page size is an implementation detail; `next`
/// is an opaque token the caller round-trips verbatim. Each operation
/// is a single independent call: there is no cross-item atomicity.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch one page of products, resuming after `next` when given.
    async fn all(&self, next: Option<&str>) -> Result<ProductRange>;

    /// Fetch one product. Absent ids return `Ok(None)`, not an error.
    async fn get(&self, id: &str) -> Result<Option<Product>>;

    /// Create or replace a product, keyed by its id.
    async fn put(&self, product: Product) -> Result<()>;

    /// Delete a product. Deleting an absent id succeeds.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Initialize the catalog store based on configuration.
///
/// Returns the `CatalogStore` implementation selected by the configured
/// store type. DynamoDB requires the `dynamo` feature.
pub async fn init_storage(
    config: &StorageConfig,
) -> std::result::Result<Arc<dyn CatalogStore>, Box<dyn std::error::Error + Send + Sync>> {
    match config.store_type.as_str() {
        "memory" => {
            info!(store_type = "memory", "Catalog store initialized");
            Ok(Arc::new(MemoryCatalogStore::new()))
        }
        #[cfg(feature = "dynamo")]
        "dynamo" => {
            let store =
                DynamoCatalogStore::new(&config.table, config.endpoint_url.as_deref()).await?;
            info!(store_type = "dynamo", table = %config.table, "Catalog store initialized");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "dynamo"))]
        "dynamo" => {
            Err("DynamoDB support requires the 'dynamo' feature. Rebuild with --features dynamo"
                .into())
        }
        other => Err(format!("Unknown store type: {}", other).into()),
    }
}
