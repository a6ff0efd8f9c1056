//! Mall catalogue endpoints.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};

use super::{Page, decode, query_pairs, to_body};
use crate::domain::Product;
use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError};

/// Filters accepted by `GET /products`. Unset filters are not sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub name: Option<String>,
    /// Backend sort key, for example `sales` or `price_asc`.
    pub sort: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category_id: Option<i64>,
    pub is_promotion: Option<bool>,
}

/// Facade over the catalogue endpoints.
#[derive(Clone)]
pub struct ProductApi {
    transport: Arc<dyn ApiTransport>,
}

impl ProductApi {
    /// Facade issuing requests through `transport`.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// `GET /products`
    pub async fn list(&self, query: &ProductQuery) -> Result<Page<Product>, ApiTransportError> {
        let request = ApiRequest::get("/products").with_query(query_pairs(query)?);
        decode(self.transport.call(&request).await?)
    }

    /// `GET /product/:id`
    pub async fn detail(&self, id: i64) -> Result<Product, ApiTransportError> {
        decode(
            self.transport
                .call(&ApiRequest::get(format!("/product/{id}")))
                .await?,
        )
    }

    /// `POST /product/create`
    pub async fn create(&self, product: &Product) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/product/create").with_body(to_body(product)?);
        self.transport.call(&request).await
    }

    /// `POST /product/update`
    pub async fn update(&self, product: &Product) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/product/update").with_body(to_body(product)?);
        self.transport.call(&request).await
    }

    /// `DELETE /product/:id`
    pub async fn delete(&self, id: i64) -> Result<Value, ApiTransportError> {
        self.transport
            .call(&ApiRequest::delete(format!("/product/{id}")))
            .await
    }

    /// `POST /product/favorite`
    pub async fn toggle_favorite(&self, product_id: i64) -> Result<Value, ApiTransportError> {
        let request =
            ApiRequest::post("/product/favorite").with_body(json!({ "product_id": product_id }));
        self.transport.call(&request).await
    }

    /// `GET /product/favorites`
    pub async fn favorites(&self) -> Result<Value, ApiTransportError> {
        self.transport
            .call(&ApiRequest::get("/product/favorites"))
            .await
    }

    /// `GET /product/rank`
    pub async fn rank(&self) -> Result<Value, ApiTransportError> {
        self.transport.call(&ApiRequest::get("/product/rank")).await
    }

    /// `GET /categories`
    pub async fn categories(&self) -> Result<Value, ApiTransportError> {
        self.transport.call(&ApiRequest::get("/categories")).await
    }
}
