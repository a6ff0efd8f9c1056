//! Favourite-product endpoints.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError};

#[derive(Clone)]
pub struct FavoriteApi {
    transport: Arc<dyn ApiTransport>,
}

impl FavoriteApi {
    /// Facade issuing requests through `transport`.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// `POST /favorite/add`
    pub async fn add(&self, product_id: i64) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/favorite/add").with_body(json!({ "product_id": product_id }));
        self.transport.call(&request).await
    }

    /// `POST /favorite/delete`
    pub async fn delete(&self, product_id: i64) -> Result<Value, ApiTransportError> {
        let request =
            ApiRequest::post("/favorite/delete").with_body(json!({ "product_id": product_id }));
        self.transport.call(&request).await
    }

    /// `GET /favorites`
    pub async fn list(&self) -> Result<Value, ApiTransportError> {
        self.transport.call(&ApiRequest::get("/favorites")).await
    }

    /// `GET /favorite/check`
    pub async fn check(&self, product_id: i64) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::get("/favorite/check")
            .with_query(vec![("product_id".to_owned(), product_id.to_string())]);
        self.transport.call(&request).await
    }
}
