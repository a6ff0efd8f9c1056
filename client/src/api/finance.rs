//! Wallet endpoints: top-up, transfers and the transaction ledger.

use std::sync::Arc;

use serde_json::{Value, json};

use super::{PageQuery, query_pairs};
use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError};

/// Facade over the finance endpoints.
#[derive(Clone)]
pub struct FinanceApi {
    transport: Arc<dyn ApiTransport>,
}

impl FinanceApi {
    /// Facade issuing requests through `transport`.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// `POST /finance/recharge`
    pub async fn recharge(&self, amount: f64) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/finance/recharge").with_body(json!({ "amount": amount }));
        self.transport.call(&request).await
    }

    /// `POST /finance/transfer`
    pub async fn transfer(&self, to_mobile: &str, amount: f64) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/finance/transfer")
            .with_body(json!({ "to_mobile": to_mobile, "amount": amount }));
        self.transport.call(&request).await
    }

    /// `GET /finance/transactions`
    pub async fn transactions(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::get("/finance/transactions").with_query(query_pairs(page)?);
        self.transport.call(&request).await
    }

    /// `GET /property/list` without paging.
    pub async fn property_fees(&self) -> Result<Value, ApiTransportError> {
        self.transport.call(&ApiRequest::get("/property/list")).await
    }
}
