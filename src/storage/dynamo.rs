//! DynamoDB catalog store.
//!
//! Table schema:
//! - `id`: product id (String, partition key)
//! - `name`: product name (String)
//! - `price`: product price (Number)
//!
//! Pagination uses Scan with a fixed limit; the opaque cursor is the
//! `id` of the last evaluated key.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

use super::{CatalogStore, Result, StorageError};
use crate::types::{Product, ProductRange};

/// Scan page size.
const PAGE_SIZE: i32 = 20;

/// DynamoDB implementation of `CatalogStore`.
pub struct DynamoCatalogStore {
    client: Client,
    table_name: String,
}

impl DynamoCatalogStore {
    /// Create a new DynamoDB catalog store.
    ///
    /// Uses the default AWS provider chain; `endpoint_url` overrides the
    /// endpoint for local stacks.
    pub async fn new(table_name: impl Into<String>, endpoint_url: Option<&str>) -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let client = if let Some(endpoint) = endpoint_url {
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(dynamo_config)
        } else {
            Client::new(&config)
        };

        let table_name = table_name.into();
        info!(table = %table_name, "Connected to DynamoDB for catalog");

        Ok(Self { client, table_name })
    }

    fn marshal(product: &Product) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S(product.id.clone()));
        item.insert("name".to_string(), AttributeValue::S(product.name.clone()));
        item.insert(
            "price".to_string(),
            AttributeValue::N(product.price.to_string()),
        );
        item
    }

    fn unmarshal(item: &HashMap<String, AttributeValue>) -> Result<Product> {
        let id = match item.get("id") {
            Some(AttributeValue::S(s)) => s.clone(),
            _ => return Err(StorageError::Corrupt("item has no string 'id'".to_string())),
        };
        let name = match item.get("name") {
            Some(AttributeValue::S(s)) => s.clone(),
            _ => {
                return Err(StorageError::Corrupt(format!(
                    "item '{}' has no string 'name'",
                    id
                )))
            }
        };
        let price = match item.get("price") {
            Some(AttributeValue::N(n)) => n.parse::<f64>().map_err(|e| {
                StorageError::Corrupt(format!("item '{}' has non-numeric price: {}", id, e))
            })?,
            _ => {
                return Err(StorageError::Corrupt(format!(
                    "item '{}' has no numeric 'price'",
                    id
                )))
            }
        };

        Ok(Product { id, name, price })
    }
}

#[async_trait]
impl CatalogStore for DynamoCatalogStore {
    async fn all(&self, next: Option<&str>) -> Result<ProductRange> {
        let mut scan = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(PAGE_SIZE);

        if let Some(cursor) = next {
            scan = scan.exclusive_start_key("id", AttributeValue::S(cursor.to_string()));
        }

        let result = scan
            .send()
            .await
            .map_err(|e| StorageError::Query(format!("DynamoDB scan failed: {}", e)))?;

        let products = result
            .items()
            .iter()
            .map(Self::unmarshal)
            .collect::<Result<Vec<Product>>>()?;

        let next = result
            .last_evaluated_key()
            .and_then(|key| match key.get("id") {
                Some(AttributeValue::S(id)) => Some(id.clone()),
                _ => None,
            });

        debug!(count = products.len(), has_next = next.is_some(), "Scanned catalog page");

        Ok(ProductRange { products, next })
    }

    async fn get(&self, id: &str) -> Result<Option<Product>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| StorageError::Query(format!("DynamoDB get_item failed: {}", e)))?;

        match result.item() {
            Some(item) => Ok(Some(Self::unmarshal(item)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, product: Product) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(Self::marshal(&product)))
            .send()
            .await
            .map_err(|e| StorageError::Write(format!("DynamoDB put_item failed: {}", e)))?;

        debug!(id = %product.id, "Stored product in DynamoDB");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| StorageError::Write(format!("DynamoDB delete_item failed: {}", e)))?;

        debug!(id = %id, "Deleted product from DynamoDB");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marshal_unmarshal_round_trip() {
        let product = Product {
            id: "iXR".to_string(),
            name: "iPhone XML".to_string(),
            price: 0.123,
        };

        let item = DynamoCatalogStore::marshal(&product);
        assert_eq!(item.get("id"), Some(&AttributeValue::S("iXR".to_string())));
        assert_eq!(
            item.get("price"),
            Some(&AttributeValue::N("0.123".to_string()))
        );

        let back = DynamoCatalogStore::unmarshal(&item).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_unmarshal_rejects_missing_fields() {
        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S("x".to_string()));
        assert!(matches!(
            DynamoCatalogStore::unmarshal(&item),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_unmarshal_rejects_bad_price() {
        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S("x".to_string()));
        item.insert("name".to_string(), AttributeValue::S("x".to_string()));
        item.insert(
            "price".to_string(),
            AttributeValue::N("not-a-number".to_string()),
        );
        assert!(matches!(
            DynamoCatalogStore::unmarshal(&item),
            Err(StorageError::Corrupt(_))
        ));
    }
}
