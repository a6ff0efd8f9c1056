//! Backend API facades, one per domain.
//!
//! Each facade maps typed arguments onto an [`ApiRequest`] and hands it to the
//! [`ApiTransport`] port. Facades hold no state beyond the shared transport
//! and perform no retries.
//!
//! [`ApiRequest`]: crate::domain::ports::ApiRequest
//! [`ApiTransport`]: crate::domain::ports::ApiTransport

mod admin;
mod auth;
mod chat;
mod comment;
mod favorite;
mod finance;
mod order;
mod product;
mod service;

pub use admin::{AdminApi, BalanceAdjustment, ParkingAssignment, ReviewDecision};
pub use auth::{AuthApi, PasswordChange, PasswordReset, ProfileUpdate, RegisterReceipt};
pub use chat::{ChatApi, DEFAULT_CHAT_TIMEOUT};
pub use comment::{CommentApi, NewComment};
pub use favorite::FavoriteApi;
pub use finance::FinanceApi;
pub use order::{
    CartUpdateMethod, NewOrder, OrderApi, OrderLine, OrderQuery, PAY_TYPE_ORDER,
    UnsupportedCartUpdateMethod,
};
pub use product::{ProductApi, ProductQuery};
pub use service::{NewRepair, NewVisitor, PAY_TYPE_PROPERTY_FEE, ServiceApi};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::ports::ApiTransportError;

/// Paging parameters shared by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    /// Request page `page` with `size` entries.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
        }
    }
}

/// One page of a paged listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: i64,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode envelope `data` into `T`.
pub(crate) fn decode<T: DeserializeOwned>(data: Value) -> Result<T, ApiTransportError> {
    serde_json::from_value(data).map_err(|error| ApiTransportError::decode(error.to_string()))
}

/// Decode a JSON array, treating `null` as empty.
pub(crate) fn decode_list<T: DeserializeOwned>(data: Value) -> Result<Vec<T>, ApiTransportError> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    decode(data)
}

/// Serialise a request payload into a JSON body.
pub(crate) fn to_body<T: Serialize>(payload: &T) -> Result<Value, ApiTransportError> {
    serde_json::to_value(payload)
        .map_err(|error| ApiTransportError::invalid_request(error.to_string()))
}

/// Flatten a serialisable struct into query pairs, omitting unset values.
pub(crate) fn query_pairs<T: Serialize>(
    params: &T,
) -> Result<Vec<(String, String)>, ApiTransportError> {
    let Value::Object(fields) = to_body(params)? else {
        return Err(ApiTransportError::invalid_request(
            "query parameters must serialise to an object",
        ));
    };
    Ok(fields
        .into_iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(text) => text,
                other => other.to_string(),
            };
            Some((key, rendered))
        })
        .collect())
}
