//! Community service endpoints: notices, repairs, visitors, parking and fees.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};

use super::{PageQuery, query_pairs, to_body};
use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError};

/// `pay_type` value marking a property-fee payment.
pub const PAY_TYPE_PROPERTY_FEE: i64 = 2;

/// Repair request filed by a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRepair {
    /// `1` repair, `2` complaint.
    #[serde(rename = "type")]
    pub kind: i32,
    pub category: String,
    pub content: String,
}

/// Visitor pre-registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVisitor {
    pub visitor_name: String,
    pub visitor_phone: String,
    pub reason: String,
    /// Expected arrival, as the backend's timestamp string.
    pub visit_time: String,
}

/// Facade over the resident service endpoints.
#[derive(Clone)]
pub struct ServiceApi {
    transport: Arc<dyn ApiTransport>,
}

impl ServiceApi {
    /// Facade issuing requests through `transport`.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    async fn get_paged(&self, path: &str, page: &PageQuery) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::get(path).with_query(query_pairs(page)?);
        self.transport.call(&request).await
    }

    /// `GET /notices`
    pub async fn notices(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/notices", page).await
    }

    /// `GET /notice/:id`
    pub async fn notice_detail(&self, id: i64) -> Result<Value, ApiTransportError> {
        self.transport
            .call(&ApiRequest::get(format!("/notice/{id}")))
            .await
    }

    /// `POST /notice/read/:id`
    pub async fn read_notice(&self, id: i64) -> Result<Value, ApiTransportError> {
        self.transport
            .call(&ApiRequest::post(format!("/notice/read/{id}")))
            .await
    }

    /// `POST /repair/create`
    pub async fn create_repair(&self, repair: &NewRepair) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/repair/create").with_body(to_body(repair)?);
        self.transport.call(&request).await
    }

    /// `GET /repair/list`
    pub async fn repairs(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/repair/list", page).await
    }

    /// `POST /visitor/create`
    pub async fn create_visitor(&self, visitor: &NewVisitor) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/visitor/create").with_body(to_body(visitor)?);
        self.transport.call(&request).await
    }

    /// `GET /visitor/list`
    pub async fn visitors(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/visitor/list", page).await
    }

    /// `GET /parking/my`
    pub async fn my_parking(&self) -> Result<Value, ApiTransportError> {
        self.transport.call(&ApiRequest::get("/parking/my")).await
    }

    /// `POST /parking/bind`
    pub async fn bind_car(
        &self,
        parking_id: i64,
        car_plate: &str,
    ) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/parking/bind")
            .with_body(json!({ "parking_id": parking_id, "car_plate": car_plate }));
        self.transport.call(&request).await
    }

    /// `GET /property/list`
    pub async fn property_fees(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/property/list", page).await
    }

    /// `POST /finance/pay` with `pay_type` 2.
    pub async fn pay_property_fee(&self, related_id: i64) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/finance/pay").with_body(
            json!({ "business_id": related_id, "pay_type": PAY_TYPE_PROPERTY_FEE }),
        );
        self.transport.call(&request).await
    }

    /// `GET /stores`
    pub async fn stores(&self) -> Result<Value, ApiTransportError> {
        self.transport.call(&ApiRequest::get("/stores")).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for service request mapping.
    use super::*;
    use crate::domain::ports::{Method, RecordingApiTransport};

    fn api() -> (Arc<RecordingApiTransport>, ServiceApi) {
        let transport = Arc::new(RecordingApiTransport::default());
        (transport.clone(), ServiceApi::new(transport))
    }

    #[tokio::test]
    async fn property_fee_payment_uses_fee_pay_type() {
        let (transport, api) = api();
        api.pay_property_fee(7).await.expect("pay");

        let request = transport.last_request().expect("request sent");
        assert_eq!((request.method, request.path.as_str()), (Method::Post, "/finance/pay"));
        assert_eq!(request.body, Some(json!({"business_id": 7, "pay_type": 2})));
    }

    #[tokio::test]
    async fn repair_kind_is_sent_as_type() {
        let (transport, api) = api();
        api.create_repair(&NewRepair {
            kind: 1,
            category: "plumbing".to_owned(),
            content: "leaking tap".to_owned(),
        })
        .await
        .expect("repair");

        assert_eq!(
            transport.last_request().and_then(|r| r.body),
            Some(json!({"type": 1, "category": "plumbing", "content": "leaking tap"}))
        );
    }

    #[tokio::test]
    async fn service_paths_match_backend_routes() {
        let (transport, api) = api();
        let page = PageQuery::default();
        api.notices(&page).await.expect("notices");
        api.notice_detail(3).await.expect("detail");
        api.read_notice(3).await.expect("read");
        api.repairs(&page).await.expect("repairs");
        api.create_visitor(&NewVisitor {
            visitor_name: "Wang".to_owned(),
            visitor_phone: "13700000000".to_owned(),
            reason: "delivery".to_owned(),
            visit_time: "2024-06-01 10:00:00".to_owned(),
        })
        .await
        .expect("visitor");
        api.visitors(&page).await.expect("visitors");
        api.my_parking().await.expect("parking");
        api.bind_car(2, "京A12345").await.expect("bind");
        api.property_fees(&page).await.expect("fees");
        api.stores().await.expect("stores");

        let calls: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        let expected = [
            (Method::Get, "/notices"),
            (Method::Get, "/notice/3"),
            (Method::Post, "/notice/read/3"),
            (Method::Get, "/repair/list"),
            (Method::Post, "/visitor/create"),
            (Method::Get, "/visitor/list"),
            (Method::Get, "/parking/my"),
            (Method::Post, "/parking/bind"),
            (Method::Get, "/property/list"),
            (Method::Get, "/stores"),
        ]
        .map(|(method, path)| (method, path.to_owned()));
        assert_eq!(calls, expected);
    }
}
