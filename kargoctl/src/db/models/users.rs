use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::api::models::users::Role;
use crate::types::UserId;

/// Full user row, password hash included. Never serialized to the API;
/// handlers convert to `UserResponse` before responding.
#[derive(Debug, Clone, FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub is_customer_service: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub is_customer_service: bool,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub role: Option<Role>,
    pub is_customer_service: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
}
