//! In-memory catalog store.
//!
//! Backs local runs and tests. Not safe for concurrent mutation:
//! single-caller-only, as the hosting invocation model processes one
//! request at a time.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CatalogStore, Result, StorageError};
use crate::types::{Product, ProductRange};

/// Page size returned by `all`, mirroring the DynamoDB scan limit.
const PAGE_SIZE: usize = 20;

/// In-memory implementation of `CatalogStore`.
///
/// Products are held in an ordered map so pagination is deterministic:
/// the cursor is the id of the last product on the page, and the next
/// page resumes strictly after it.
#[derive(Default)]
pub struct MemoryCatalogStore {
    products: RwLock<BTreeMap<String, Product>>,
    fail_on_read: RwLock<bool>,
    fail_on_write: RwLock<bool>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail, for exercising error paths in tests.
    pub async fn set_fail_on_read(&self, fail: bool) {
        *self.fail_on_read.write().await = fail;
    }

    /// Make subsequent writes fail, for exercising error paths in tests.
    pub async fn set_fail_on_write(&self, fail: bool) {
        *self.fail_on_write.write().await = fail;
    }

    /// Number of products currently stored.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn all(&self, next: Option<&str>) -> Result<ProductRange> {
        if *self.fail_on_read.read().await {
            return Err(StorageError::Query("injected read failure".to_string()));
        }

        let products = self.products.read().await;

        let page: Vec<Product> = match next {
            Some(cursor) => products
                .range::<str, _>((
                    std::ops::Bound::Excluded(cursor),
                    std::ops::Bound::Unbounded,
                ))
                .take(PAGE_SIZE)
                .map(|(_, p)| p.clone())
                .collect(),
            None => products.values().take(PAGE_SIZE).cloned().collect(),
        };

        // More items remain iff the last id on this page is not the last
        // id in the map.
        let next = match (page.last(), products.keys().next_back()) {
            (Some(last), Some(max_id)) if last.id != *max_id => Some(last.id.clone()),
            _ => None,
        };

        Ok(ProductRange {
            products: page,
            next,
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Product>> {
        if *self.fail_on_read.read().await {
            return Err(StorageError::Query("injected read failure".to_string()));
        }
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn put(&self, product: Product) -> Result<()> {
        if *self.fail_on_write.read().await {
            return Err(StorageError::Write("injected write failure".to_string()));
        }
        self.products
            .write()
            .await
            .insert(product.id.clone(), product);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if *self.fail_on_write.read().await {
            return Err(StorageError::Write("injected write failure".to_string()));
        }
        self.products.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("product {}", id),
            price: 1.0,
        }
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let store = MemoryCatalogStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryCatalogStore::new();
        store.put(product("a")).await.unwrap();

        let found = store.get("a").await.unwrap().unwrap();
        assert_eq!(found.id, "a");
        assert_eq!(found.name, "product a");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryCatalogStore::new();
        store.put(product("a")).await.unwrap();

        store.delete("a").await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());

        // Deleting again is not an error.
        store.delete("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_pagination_walks_all_products_in_order() {
        let store = MemoryCatalogStore::new();
        for i in 0..45 {
            store.put(product(&format!("{:03}", i))).await.unwrap();
        }

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let range = store.all(cursor.as_deref()).await.unwrap();
            assert!(range.products.len() <= PAGE_SIZE);
            seen.extend(range.products.into_iter().map(|p| p.id));
            match range.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        let expected: Vec<String> = (0..45).map(|i| format!("{:03}", i)).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_last_page_has_no_next() {
        let store = MemoryCatalogStore::new();
        store.put(product("only")).await.unwrap();

        let range = store.all(None).await.unwrap();
        assert_eq!(range.products.len(), 1);
        assert!(range.next.is_none());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryCatalogStore::new();
        store.set_fail_on_read(true).await;
        assert!(store.get("a").await.is_err());
        assert!(store.all(None).await.is_err());

        store.set_fail_on_write(true).await;
        assert!(store.put(product("a")).await.is_err());
        assert!(store.delete("a").await.is_err());
    }
}
