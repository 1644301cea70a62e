//! API Gateway adapter for the catalog service.
//!
//! Routing is the gateway's job; each handler here receives an already
//! routed request and maps service results onto HTTP status codes:
//! validation failures are client errors, store failures are server
//! errors, an absent product on GET is 404.

use std::collections::HashMap;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::services::{CatalogError, CatalogService};

/// An already routed gateway request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpRequest {
    pub path_parameters: HashMap<String, String>,
    pub query_string_parameters: HashMap<String, String>,
    pub body: Option<String>,
}

/// The response handed back to the gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Handles gateway requests against the catalog service.
pub struct ApiGatewayHandler {
    catalog: CatalogService,
}

impl ApiGatewayHandler {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    /// GET /: list one page of products.
    pub async fn all_handler(&self, request: &HttpRequest) -> HttpResponse {
        let next = request.query_string_parameters.get("next");

        match self.catalog.all(next.map(String::as_str)).await {
            Ok(range) => response(StatusCode::OK, &range),
            Err(e) => {
                error!(error = %e, "List products failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
            }
        }
    }

    /// GET /{id}: fetch one product.
    pub async fn get_handler(&self, request: &HttpRequest) -> HttpResponse {
        let Some(id) = request.path_parameters.get("id") else {
            return error_response(StatusCode::BAD_REQUEST, "missing 'id' parameter in path");
        };

        match self.catalog.get(id).await {
            Ok(Some(product)) => response(StatusCode::OK, &product),
            Ok(None) => error_response(StatusCode::NOT_FOUND, "product not found"),
            Err(e) => {
                error!(id = %id, error = %e, "Get product failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
            }
        }
    }

    /// PUT /{id}: create or replace one product.
    pub async fn put_handler(&self, request: &HttpRequest) -> HttpResponse {
        let Some(id) = request.path_parameters.get("id") else {
            return error_response(StatusCode::BAD_REQUEST, "missing 'id' parameter in path");
        };

        let body = request.body.as_deref().unwrap_or_default();
        if body.trim().is_empty() {
            return error_response(StatusCode::BAD_REQUEST, "empty request body");
        }

        match self.catalog.put(id, body.as_bytes()).await {
            Ok(product) => response(StatusCode::CREATED, &product),
            Err(e @ (CatalogError::MalformedBody(_) | CatalogError::IdMismatch)) => {
                error_response(StatusCode::BAD_REQUEST, &e.to_string())
            }
            Err(e) => {
                error!(id = %id, error = %e, "Put product failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
            }
        }
    }

    /// DELETE /{id}: delete one product.
    pub async fn delete_handler(&self, request: &HttpRequest) -> HttpResponse {
        let Some(id) = request.path_parameters.get("id") else {
            return error_response(StatusCode::BAD_REQUEST, "missing 'id' parameter in path");
        };

        match self.catalog.delete(id).await {
            Ok(()) => response(StatusCode::OK, &json!(null)),
            Err(e) => {
                error!(id = %id, error = %e, "Delete product failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
            }
        }
    }
}

fn response<T: Serialize>(status: StatusCode, object: &T) -> HttpResponse {
    let body = match serde_json::to_string(object) {
        Ok(body) => body,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };

    HttpResponse {
        status_code: status.as_u16(),
        headers: json_headers(),
        body,
    }
}

fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse {
        status_code: status.as_u16(),
        headers: json_headers(),
        body: json!({ "message": message }).to_string(),
    }
}

fn json_headers() -> HashMap<String, String> {
    HashMap::from([("Content-Type".to_string(), "application/json".to_string())])
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{CatalogStore, MemoryCatalogStore};
    use crate::types::Product;

    fn handler_with_store() -> (ApiGatewayHandler, Arc<MemoryCatalogStore>) {
        let store = Arc::new(MemoryCatalogStore::new());
        let handler = ApiGatewayHandler::new(CatalogService::new(store.clone()));
        (handler, store)
    }

    fn request_with_id(id: &str) -> HttpRequest {
        HttpRequest {
            path_parameters: HashMap::from([("id".to_string(), id.to_string())]),
            ..HttpRequest::default()
        }
    }

    #[tokio::test]
    async fn test_get_missing_id_parameter_is_400() {
        let (handler, _) = handler_with_store();
        let response = handler.get_handler(&HttpRequest::default()).await;
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_get_absent_product_is_404() {
        let (handler, _) = handler_with_store();
        let response = handler.get_handler(&request_with_id("nope")).await;
        assert_eq!(response.status_code, 404);
        assert!(response.body.contains("product not found"));
    }

    #[tokio::test]
    async fn test_get_store_failure_is_500() {
        let (handler, store) = handler_with_store();
        store.set_fail_on_read(true).await;
        let response = handler.get_handler(&request_with_id("x")).await;
        assert_eq!(response.status_code, 500);
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let (handler, _) = handler_with_store();

        let mut request = request_with_id("iXR");
        request.body = Some(r#"{"id":"iXR","name":"iPhone XML","price":0.123}"#.to_string());

        let response = handler.put_handler(&request).await;
        assert_eq!(response.status_code, 201);

        let response = handler.get_handler(&request_with_id("iXR")).await;
        assert_eq!(response.status_code, 200);

        let product: Product = serde_json::from_str(&response.body).unwrap();
        assert_eq!(product.name, "iPhone XML");
        assert_eq!(product.price, 0.123);
    }

    #[tokio::test]
    async fn test_put_empty_body_is_400() {
        let (handler, _) = handler_with_store();

        let mut request = request_with_id("iXR");
        request.body = Some("   ".to_string());
        assert_eq!(handler.put_handler(&request).await.status_code, 400);

        request.body = None;
        assert_eq!(handler.put_handler(&request).await.status_code, 400);
    }

    #[tokio::test]
    async fn test_put_malformed_body_is_400() {
        let (handler, _) = handler_with_store();

        let mut request = request_with_id("iXR");
        request.body = Some("{not json".to_string());
        let response = handler.put_handler(&request).await;
        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("message"));
    }

    #[tokio::test]
    async fn test_put_id_mismatch_is_400() {
        let (handler, _) = handler_with_store();

        let mut request = request_with_id("iXR");
        request.body = Some(r#"{"id":"other","name":"n","price":1.0}"#.to_string());
        assert_eq!(handler.put_handler(&request).await.status_code, 400);
    }

    #[tokio::test]
    async fn test_delete_is_200_even_when_absent() {
        let (handler, _) = handler_with_store();
        let response = handler.delete_handler(&request_with_id("nope")).await;
        assert_eq!(response.status_code, 200);
    }

    #[tokio::test]
    async fn test_all_returns_page() {
        let (handler, store) = handler_with_store();
        store
            .put(Product {
                id: "a".to_string(),
                name: "a".to_string(),
                price: 1.0,
            })
            .await
            .unwrap();

        let response = handler.all_handler(&HttpRequest::default()).await;
        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("\"products\""));
    }

    #[tokio::test]
    async fn test_all_with_whitespace_next_parameter() {
        let (handler, _) = handler_with_store();

        let request = HttpRequest {
            query_string_parameters: HashMap::from([("next".to_string(), " ".to_string())]),
            ..HttpRequest::default()
        };
        let response = handler.all_handler(&request).await;
        assert_eq!(response.status_code, 200);
    }
}
