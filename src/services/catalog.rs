//! Catalog service: validates requests and orchestrates store calls.

use std::sync::Arc;

use tracing::debug;

use crate::storage::{CatalogStore, StorageError};
use crate::types::{Product, ProductRange};

/// Errors produced by catalog operations.
///
/// `MalformedBody` and `IdMismatch` are client errors; `Store` wraps any
/// underlying persistence failure without classifying it further.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse product from request body")]
    MalformedBody(#[source] serde_json::Error),

    #[error("product ID in path does not match product ID in body")]
    IdMismatch,

    #[error("store operation failed")]
    Store(#[from] StorageError),
}

/// Validates and orchestrates catalog store operations.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Fetch one product. An absent id is `Ok(None)`, not an error.
    pub async fn get(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.store.get(id).await?)
    }

    /// Fetch one page of products.
    ///
    /// A cursor that is absent or consists only of whitespace means
    /// "start from the beginning".
    pub async fn all(&self, next: Option<&str>) -> Result<ProductRange, CatalogError> {
        let next = next.filter(|cursor| !cursor.trim().is_empty());
        Ok(self.store.all(next).await?)
    }

    /// Parse `body` as a product and persist it under `id`.
    ///
    /// The body must be well-formed JSON and its id must equal the
    /// addressing `id`; neither validation failure reaches the store.
    pub async fn put(&self, id: &str, body: &[u8]) -> Result<Product, CatalogError> {
        let product: Product =
            serde_json::from_slice(body).map_err(CatalogError::MalformedBody)?;

        if product.id != id {
            return Err(CatalogError::IdMismatch);
        }

        self.store.put(product.clone()).await?;
        debug!(id = %product.id, "Stored product");

        Ok(product)
    }

    /// Delete a product. Deleting an absent id succeeds.
    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        self.store.delete(id).await?;
        debug!(id = %id, "Deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCatalogStore;

    fn service_with_store() -> (CatalogService, Arc<MemoryCatalogStore>) {
        let store = Arc::new(MemoryCatalogStore::new());
        (CatalogService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_get_absent_product_is_none_not_error() {
        let (service, _) = service_with_store();
        assert!(service.get("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_existing_product() {
        let (service, store) = service_with_store();
        store
            .put(Product {
                id: "iXR".to_string(),
                name: "iPhone XML".to_string(),
                price: 0.123,
            })
            .await
            .unwrap();

        let product = service.get("iXR").await.unwrap().unwrap();
        assert_eq!(product.name, "iPhone XML");
        assert_eq!(product.price, 0.123);
    }

    #[tokio::test]
    async fn test_get_store_failure_propagates() {
        let (service, store) = service_with_store();
        store.set_fail_on_read(true).await;

        assert!(matches!(
            service.get("1").await,
            Err(CatalogError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_put_round_trips_the_product() {
        let (service, _) = service_with_store();
        let body = br#"{"id":"iXR","name":"iPhone XML","price":0.123}"#;

        let product = service.put("iXR", body).await.unwrap();
        assert_eq!(product.id, "iXR");

        let fetched = service.get("iXR").await.unwrap().unwrap();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    async fn test_put_malformed_body_writes_nothing() {
        let (service, store) = service_with_store();

        let result = service.put("iXR", b"{not json").await;
        assert!(matches!(result, Err(CatalogError::MalformedBody(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_id_mismatch_writes_nothing() {
        let (service, store) = service_with_store();
        let body = br#"{"id":"other","name":"n","price":1.0}"#;

        let result = service.put("iXR", body).await;
        assert!(matches!(result, Err(CatalogError::IdMismatch)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_whitespace_cursor_equals_absent() {
        let (service, store) = service_with_store();
        store
            .put(Product {
                id: "a".to_string(),
                name: "a".to_string(),
                price: 1.0,
            })
            .await
            .unwrap();

        let from_whitespace = service.all(Some(" ")).await.unwrap();
        let from_absent = service.all(None).await.unwrap();
        assert_eq!(from_whitespace, from_absent);
        assert_eq!(from_whitespace.products.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_absent_product_succeeds() {
        let (service, _) = service_with_store();
        service.delete("missing").await.unwrap();
    }
}
