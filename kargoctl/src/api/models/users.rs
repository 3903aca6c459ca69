use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;

/// Account role. Couriers scan and log cargo; admins run the office panel.
/// Customer-service staff are couriers with the `is_customer_service`
/// capability, not a third role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Kurye,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Kurye => "kurye",
            Role::Admin => "admin",
        }
    }
}

/// User shape returned by login and session-check responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub name: String,
}

impl From<&crate::auth::CurrentUser> for UserResponse {
    fn from(user: &crate::auth::CurrentUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            name: user.name.clone(),
        }
    }
}

impl From<&UserDBResponse> for UserResponse {
    fn from(user: &UserDBResponse) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            name: user.name.clone(),
        }
    }
}

/// Entry in the courier dropdown used by office staff.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct KuryeResponse {
    pub id: UserId,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KuryeListResponse {
    pub success: bool,
    pub kuryeler: Vec<KuryeResponse>,
}
