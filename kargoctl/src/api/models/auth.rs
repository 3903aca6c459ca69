use axum::Json;
use axum::http::{StatusCode, header::SET_COOKIE};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::api::models::users::{Role, UserResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    /// Browser-tab identifier; scopes the session cookie so two tabs can
    /// hold different sessions.
    #[serde(rename = "tabId")]
    pub tab_id: Option<String>,
}

/// Successful login: JSON body plus the session `Set-Cookie` header.
#[derive(Debug)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub cookie: String,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(SET_COOKIE, self.cookie)],
            Json(json!({ "success": true, "user": self.user })),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthCheckResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LogoutRequest {
    #[serde(rename = "tabId")]
    pub tab_id: Option<String>,
}

/// Logout clears the (possibly tab-scoped) session cookie.
#[derive(Debug)]
pub struct LogoutResponse {
    pub cookie: String,
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(SET_COOKIE, self.cookie)],
            Json(json!({ "success": true })),
        )
            .into_response()
    }
}
