//! Admin console endpoints for staff roles.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};

use super::{PageQuery, ProductApi, query_pairs, to_body};
use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError};
use crate::domain::{Product, Role};

/// Staff decision on a visitor registration or repair ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDecision {
    pub id: i64,
    pub status: i32,
    /// Sent as `remark` for visitors and `feedback` for repairs.
    pub note: String,
}

/// Manual balance change for one account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceAdjustment {
    pub user_id: i64,
    pub amount: f64,
}

/// Allocation of a parking space to a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParkingAssignment {
    pub id: i64,
    pub user_id: i64,
    pub car_plate: String,
}

/// Facade over the admin endpoints.
#[derive(Clone)]
pub struct AdminApi {
    transport: Arc<dyn ApiTransport>,
    products: ProductApi,
}

impl AdminApi {
    /// Facade issuing requests through `transport`.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            products: ProductApi::new(transport.clone()),
            transport,
        }
    }

    async fn get(&self, path: &str) -> Result<Value, ApiTransportError> {
        self.transport.call(&ApiRequest::get(path)).await
    }

    async fn get_paged(&self, path: &str, page: &PageQuery) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::get(path).with_query(query_pairs(page)?);
        self.transport.call(&request).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiTransportError> {
        self.transport
            .call(&ApiRequest::post(path).with_body(body))
            .await
    }

    async fn delete(&self, path: String) -> Result<Value, ApiTransportError> {
        self.transport.call(&ApiRequest::delete(path)).await
    }

    /// `GET /dashboard/stats`
    pub async fn dashboard_stats(&self) -> Result<Value, ApiTransportError> {
        self.get("/dashboard/stats").await
    }

    /// `GET /admin/user/list`
    pub async fn users(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/admin/user/list", page).await
    }

    /// `POST /admin/user/freeze`; `status` 0 freezes, 1 restores.
    pub async fn freeze_user(&self, id: i64, status: i32) -> Result<Value, ApiTransportError> {
        self.post("/admin/user/freeze", json!({ "id": id, "status": status }))
            .await
    }

    /// `GET /admin/role/list`
    pub async fn roles(&self) -> Result<Value, ApiTransportError> {
        self.get("/admin/role/list").await
    }

    /// `POST /admin/role/create`
    pub async fn create_role(&self, role: &Value) -> Result<Value, ApiTransportError> {
        self.post("/admin/role/create", role.clone()).await
    }

    /// `GET /admin/menu/list`
    pub async fn menus(&self) -> Result<Value, ApiTransportError> {
        self.get("/admin/menu/list").await
    }

    /// `GET /visitor/admin/list`
    pub async fn visitors(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/visitor/admin/list", page).await
    }

    /// `POST /visitor/audit`
    pub async fn audit_visitor(
        &self,
        decision: &ReviewDecision,
    ) -> Result<Value, ApiTransportError> {
        let body = json!({
            "id": decision.id,
            "status": decision.status,
            "remark": decision.note,
        });
        self.post("/visitor/audit", body).await
    }

    /// `GET /repair/admin/list`
    pub async fn repairs(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/repair/admin/list", page).await
    }

    /// `POST /repair/process`
    pub async fn process_repair(
        &self,
        decision: &ReviewDecision,
    ) -> Result<Value, ApiTransportError> {
        let body = json!({
            "id": decision.id,
            "status": decision.status,
            "feedback": decision.note,
        });
        self.post("/repair/process", body).await
    }

    /// `POST /product/create`
    pub async fn create_product(&self, product: &Product) -> Result<Value, ApiTransportError> {
        self.products.create(product).await
    }

    /// `POST /product/update`
    pub async fn update_product(&self, product: &Product) -> Result<Value, ApiTransportError> {
        self.products.update(product).await
    }

    /// `DELETE /product/:id`
    pub async fn delete_product(&self, id: i64) -> Result<Value, ApiTransportError> {
        self.products.delete(id).await
    }

    /// `GET /order/admin/list`
    pub async fn orders(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/order/admin/list", page).await
    }

    /// `POST /order/ship`
    pub async fn ship_order(&self, id: i64) -> Result<Value, ApiTransportError> {
        self.post("/order/ship", json!({ "id": id })).await
    }

    /// `POST /store/create`
    pub async fn create_store(&self, store: &Value) -> Result<Value, ApiTransportError> {
        self.post("/store/create", store.clone()).await
    }

    /// `POST /store/update`
    pub async fn update_store(&self, store: &Value) -> Result<Value, ApiTransportError> {
        self.post("/store/update", store.clone()).await
    }

    /// `DELETE /store/:id`
    pub async fn delete_store(&self, id: i64) -> Result<Value, ApiTransportError> {
        self.delete(format!("/store/{id}")).await
    }

    /// `POST /notice/create`
    pub async fn create_notice(&self, notice: &Value) -> Result<Value, ApiTransportError> {
        self.post("/notice/create", notice.clone()).await
    }

    /// `DELETE /notice/:id`
    pub async fn delete_notice(&self, id: i64) -> Result<Value, ApiTransportError> {
        self.delete(format!("/notice/{id}")).await
    }

    /// `POST /admin/user/assign_role`
    pub async fn assign_role(&self, user_id: i64, role: Role) -> Result<Value, ApiTransportError> {
        self.post(
            "/admin/user/assign_role",
            json!({ "user_id": user_id, "role_code": role.as_str() }),
        )
        .await
    }

    /// `POST /admin/user/update_balance`
    pub async fn update_user_balance(
        &self,
        adjustment: &BalanceAdjustment,
    ) -> Result<Value, ApiTransportError> {
        self.post("/admin/user/update_balance", to_body(adjustment)?)
            .await
    }

    /// `GET /parking/admin/list`
    pub async fn parking(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/parking/admin/list", page).await
    }

    /// `GET /parking/admin/stats`
    pub async fn parking_stats(&self) -> Result<Value, ApiTransportError> {
        self.get("/parking/admin/stats").await
    }

    /// `POST /parking/admin/assign`
    pub async fn assign_parking(
        &self,
        assignment: &ParkingAssignment,
    ) -> Result<Value, ApiTransportError> {
        self.post("/parking/admin/assign", to_body(assignment)?)
            .await
    }

    /// `POST /property/admin/create`
    pub async fn create_property_fee(&self, fee: &Value) -> Result<Value, ApiTransportError> {
        self.post("/property/admin/create", fee.clone()).await
    }

    /// `GET /property/admin/list`
    pub async fn property_fees(&self, page: &PageQuery) -> Result<Value, ApiTransportError> {
        self.get_paged("/property/admin/list", page).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for admin request mapping.
    use super::*;
    use crate::domain::ports::{Method, RecordingApiTransport};

    fn api() -> (Arc<RecordingApiTransport>, AdminApi) {
        let transport = Arc::new(RecordingApiTransport::default());
        (transport.clone(), AdminApi::new(transport))
    }

    #[tokio::test]
    async fn review_notes_use_endpoint_specific_keys() {
        let (transport, api) = api();
        let decision = ReviewDecision {
            id: 4,
            status: 1,
            note: "ok".to_owned(),
        };

        api.audit_visitor(&decision).await.expect("audit");
        api.process_repair(&decision).await.expect("process");

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/visitor/audit");
        assert_eq!(
            requests[0].body,
            Some(json!({"id": 4, "status": 1, "remark": "ok"}))
        );
        assert_eq!(requests[1].path, "/repair/process");
        assert_eq!(
            requests[1].body,
            Some(json!({"id": 4, "status": 1, "feedback": "ok"}))
        );
    }

    #[tokio::test]
    async fn user_management_bodies() {
        let (transport, api) = api();
        api.freeze_user(9, 0).await.expect("freeze");
        api.assign_role(9, Role::Property).await.expect("assign");
        api.update_user_balance(&BalanceAdjustment {
            user_id: 9,
            amount: 50.0,
        })
        .await
        .expect("balance");
        api.assign_parking(&ParkingAssignment {
            id: 1,
            user_id: 9,
            car_plate: "沪B00001".to_owned(),
        })
        .await
        .expect("parking");

        let bodies: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|r| (r.path, r.body))
            .collect();
        assert_eq!(
            bodies,
            vec![
                (
                    "/admin/user/freeze".to_owned(),
                    Some(json!({"id": 9, "status": 0}))
                ),
                (
                    "/admin/user/assign_role".to_owned(),
                    Some(json!({"user_id": 9, "role_code": "property"}))
                ),
                (
                    "/admin/user/update_balance".to_owned(),
                    Some(json!({"user_id": 9, "amount": 50.0}))
                ),
                (
                    "/parking/admin/assign".to_owned(),
                    Some(json!({"id": 1, "user_id": 9, "car_plate": "沪B00001"}))
                ),
            ]
        );
    }

    #[tokio::test]
    async fn listing_and_deletion_paths() {
        let (transport, api) = api();
        let page = PageQuery::new(1, 10);
        api.dashboard_stats().await.expect("stats");
        api.users(&page).await.expect("users");
        api.roles().await.expect("roles");
        api.create_role(&json!({"name": "Guard", "code": "guard"}))
            .await
            .expect("create role");
        api.menus().await.expect("menus");
        api.visitors(&page).await.expect("visitors");
        api.repairs(&page).await.expect("repairs");
        api.orders(&page).await.expect("orders");
        api.ship_order(3).await.expect("ship");
        api.create_store(&json!({"name": "Corner"}))
            .await
            .expect("store");
        api.update_store(&json!({"id": 1})).await.expect("update store");
        api.delete_store(1).await.expect("delete store");
        api.create_notice(&json!({"title": "Water"}))
            .await
            .expect("notice");
        api.delete_notice(2).await.expect("delete notice");
        api.delete_product(5).await.expect("delete product");
        api.parking(&page).await.expect("parking");
        api.parking_stats().await.expect("parking stats");
        api.create_property_fee(&json!({"amount": 300}))
            .await
            .expect("fee");
        api.property_fees(&page).await.expect("fees");

        let calls: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        let expected = [
            (Method::Get, "/dashboard/stats"),
            (Method::Get, "/admin/user/list"),
            (Method::Get, "/admin/role/list"),
            (Method::Post, "/admin/role/create"),
            (Method::Get, "/admin/menu/list"),
            (Method::Get, "/visitor/admin/list"),
            (Method::Get, "/repair/admin/list"),
            (Method::Get, "/order/admin/list"),
            (Method::Post, "/order/ship"),
            (Method::Post, "/store/create"),
            (Method::Post, "/store/update"),
            (Method::Delete, "/store/1"),
            (Method::Post, "/notice/create"),
            (Method::Delete, "/notice/2"),
            (Method::Delete, "/product/5"),
            (Method::Get, "/parking/admin/list"),
            (Method::Get, "/parking/admin/stats"),
            (Method::Post, "/property/admin/create"),
            (Method::Get, "/property/admin/list"),
        ]
        .map(|(method, path)| (method, path.to_owned()));
        assert_eq!(calls, expected);
    }
}
