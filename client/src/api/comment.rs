//! Product review endpoints.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{PageQuery, query_pairs, to_body};
use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError};

/// Review left on a purchased product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub product_id: i64,
    pub content: String,
    /// Star rating, 1 to 5.
    pub rating: u8,
}

#[derive(Serialize)]
struct CommentQuery {
    #[serde(flatten)]
    page: PageQuery,
    product_id: i64,
}

#[derive(Clone)]
pub struct CommentApi {
    transport: Arc<dyn ApiTransport>,
}

impl CommentApi {
    /// Facade issuing requests through `transport`.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// `GET /comments`
    pub async fn list(&self, product_id: i64, page: PageQuery) -> Result<Value, ApiTransportError> {
        let query = query_pairs(&CommentQuery { page, product_id })?;
        self.transport
            .call(&ApiRequest::get("/comments").with_query(query))
            .await
    }

    /// `POST /comment/create`
    pub async fn create(&self, comment: &NewComment) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/comment/create").with_body(to_body(comment)?);
        self.transport.call(&request).await
    }
}
