//! Account endpoints: registration, login, profile and password management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{decode, to_body};
use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError};
use crate::domain::{CodeCredentials, LoginGrant, PasswordCredentials, Registration, UserProfile};

/// Identifier returned by a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RegisterReceipt {
    pub uid: i64,
}

/// Password reset via SMS code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordReset {
    pub mobile: String,
    pub code: String,
    pub new_password: String,
}

/// Password change for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

/// Partial profile update; unset fields are left untouched by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Facade over the account endpoints.
#[derive(Clone)]
pub struct AuthApi {
    transport: Arc<dyn ApiTransport>,
}

impl AuthApi {
    /// Facade issuing requests through `transport`.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// `POST /register`
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegisterReceipt, ApiTransportError> {
        let body = json!({
            "mobile": registration.mobile(),
            "password": registration.password(),
            "username": registration.username,
            "real_name": registration.real_name,
            "age": registration.age,
            "gender": registration.gender,
            "avatar": registration.avatar,
            "email": registration.email,
        });
        let data = self
            .transport
            .call(&ApiRequest::post("/register").with_body(body))
            .await?;
        decode(data)
    }

    /// `POST /login`
    pub async fn login(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<LoginGrant, ApiTransportError> {
        let body = json!({
            "mobile": credentials.mobile(),
            "password": credentials.password(),
        });
        let data = self
            .transport
            .call(&ApiRequest::post("/login").with_body(body))
            .await?;
        decode(data)
    }

    /// `POST /logout`
    pub async fn logout(&self) -> Result<Value, ApiTransportError> {
        self.transport.call(&ApiRequest::post("/logout")).await
    }

    /// `POST /send_code`
    pub async fn send_code(&self, mobile: &str) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/send_code").with_body(json!({ "mobile": mobile }));
        self.transport.call(&request).await
    }

    /// `POST /login_code`
    pub async fn login_by_code(
        &self,
        credentials: &CodeCredentials,
    ) -> Result<LoginGrant, ApiTransportError> {
        let body = json!({
            "mobile": credentials.mobile(),
            "code": credentials.code(),
        });
        let data = self
            .transport
            .call(&ApiRequest::post("/login_code").with_body(body))
            .await?;
        decode(data)
    }

    /// `POST /forget_password`
    pub async fn forget_password(&self, reset: &PasswordReset) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/forget_password").with_body(to_body(reset)?);
        self.transport.call(&request).await
    }

    /// `GET /user/info`
    pub async fn profile(&self) -> Result<UserProfile, ApiTransportError> {
        let data = self.transport.call(&ApiRequest::get("/user/info")).await?;
        decode(data)
    }

    /// `POST /user/update`
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/user/update").with_body(to_body(update)?);
        self.transport.call(&request).await
    }

    /// `POST /user/change_password`
    pub async fn change_password(
        &self,
        change: &PasswordChange,
    ) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/user/change_password").with_body(to_body(change)?);
        self.transport.call(&request).await
    }
}
