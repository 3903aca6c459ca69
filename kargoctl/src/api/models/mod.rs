//! Request and response types for the HTTP API.
//!
//! Field names follow the panel's wire format (Turkish domain terms,
//! camelCase only where the frontend already uses it, e.g. `tabId`).

use serde::Serialize;
use utoipa::ToSchema;

pub mod auth;
pub mod exchange_cargos;
pub mod problem_cargos;
pub mod transactions;
pub mod users;

/// Shared `{success, message}` envelope for deletes and simple updates.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
