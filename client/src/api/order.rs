//! Cart and order endpoints.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use super::{decode_list, query_pairs, to_body};
use crate::domain::CartItem;
use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError, Method};

/// `pay_type` value marking an order payment.
pub const PAY_TYPE_ORDER: i64 = 1;

/// HTTP verb used for `/cart/:id` quantity updates.
///
/// The backend registers the route under `POST`; other deployments may bind
/// it to `PUT` or `PATCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartUpdateMethod {
    #[default]
    Post,
    Put,
    Patch,
}

impl CartUpdateMethod {
    fn method(self) -> Method {
        match self {
            Self::Post => Method::Post,
            Self::Put => Method::Put,
            Self::Patch => Method::Patch,
        }
    }
}

impl fmt::Display for CartUpdateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
        })
    }
}

/// Error returned for an unsupported cart update verb.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported cart update method: {0} (expected post, put or patch)")]
pub struct UnsupportedCartUpdateMethod(pub String);

impl FromStr for CartUpdateMethod {
    type Err = UnsupportedCartUpdateMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            _ => Err(UnsupportedCartUpdateMethod(value.to_owned())),
        }
    }
}

/// One cart line selected for checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub cart_id: i64,
    pub quantity: i32,
}

/// Checkout request for `/order/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub items: Vec<OrderLine>,
    pub store_id: i64,
}

/// Filters accepted by `GET /order/list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub status: Option<i32>,
}

/// Facade over the cart and order endpoints.
#[derive(Clone)]
pub struct OrderApi {
    transport: Arc<dyn ApiTransport>,
    cart_update_method: CartUpdateMethod,
}

impl OrderApi {
    /// Facade using `POST` for cart quantity updates.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self::with_cart_update_method(transport, CartUpdateMethod::default())
    }

    /// Facade updating cart quantities with `cart_update_method`.
    pub fn with_cart_update_method(
        transport: Arc<dyn ApiTransport>,
        cart_update_method: CartUpdateMethod,
    ) -> Self {
        Self {
            transport,
            cart_update_method,
        }
    }

    /// `POST /cart/add`
    pub async fn add_to_cart(
        &self,
        product_id: i64,
        quantity: i32,
    ) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/cart/add")
            .with_body(json!({ "product_id": product_id, "quantity": quantity }));
        self.transport.call(&request).await
    }

    /// `GET /cart/list`
    pub async fn cart_list(&self) -> Result<Vec<CartItem>, ApiTransportError> {
        decode_list(self.transport.call(&ApiRequest::get("/cart/list")).await?)
    }

    /// `DELETE /cart/:id`
    pub async fn delete_cart_item(&self, id: i64) -> Result<Value, ApiTransportError> {
        self.transport
            .call(&ApiRequest::delete(format!("/cart/{id}")))
            .await
    }

    /// `POST /cart/:id` (verb configurable)
    pub async fn update_cart_quantity(
        &self,
        id: i64,
        quantity: i32,
    ) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::new(self.cart_update_method.method(), format!("/cart/{id}"))
            .with_body(json!({ "quantity": quantity }));
        self.transport.call(&request).await
    }

    /// `POST /order/create`
    pub async fn create(&self, order: &NewOrder) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/order/create").with_body(to_body(order)?);
        self.transport.call(&request).await
    }

    /// `GET /order/list`
    pub async fn list(&self, query: &OrderQuery) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::get("/order/list").with_query(query_pairs(query)?);
        self.transport.call(&request).await
    }

    /// `POST /finance/pay` with `pay_type` 1.
    pub async fn pay(&self, order_id: i64) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/finance/pay")
            .with_body(json!({ "business_id": order_id, "pay_type": PAY_TYPE_ORDER }));
        self.transport.call(&request).await
    }

    /// `POST /order/cancel`
    pub async fn cancel(&self, order_id: i64) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/order/cancel").with_body(json!({ "id": order_id }));
        self.transport.call(&request).await
    }

    /// `POST /order/receive`
    pub async fn receive(&self, order_id: i64) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/order/receive").with_body(json!({ "id": order_id }));
        self.transport.call(&request).await
    }
}
