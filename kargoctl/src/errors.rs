//! Application error types and their HTTP mapping.
//!
//! Every handler returns `Result<_, Error>`; the `IntoResponse` impl turns
//! the error into the JSON envelope the frontend expects
//! (`{"success": false, "error": "..."}`) and logs it at a severity that
//! matches who caused it: client mistakes are debug/info noise, server
//! faults are errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::db::errors::DbError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Login failed: unknown user, wrong password or role mismatch.
    /// The message is user-facing and deliberately distinguishes the cases.
    #[error("{message}")]
    InvalidCredentials { message: String },

    /// No valid session, or the session's user may not perform the action.
    #[error("forbidden: {message:?}")]
    Forbidden { message: Option<String> },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Something on our side went wrong that we don't want to leak.
    #[error("internal error during {operation}")]
    Internal { operation: String },

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db) => match db {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } | DbError::CheckViolation { .. } => {
                    StatusCode::BAD_REQUEST
                }
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message placed in the JSON envelope. Turkish, since that is what the
    /// panel displays verbatim to couriers and office staff.
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidCredentials { message } => message.clone(),
            Error::Forbidden { message } => message
                .clone()
                .unwrap_or_else(|| "Yetkisiz erişim".to_string()),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource } => format!("{resource} bulunamadı"),
            Error::Internal { .. } | Error::Other(_) => "Sunucu hatası".to_string(),
            Error::Database(db) => match db {
                DbError::NotFound => "Kayıt bulunamadı".to_string(),
                DbError::UniqueViolation { .. } => "Bu kayıt zaten mevcut".to_string(),
                DbError::ForeignKeyViolation { .. } | DbError::CheckViolation { .. } => {
                    "Geçersiz veri".to_string()
                }
                DbError::Other(_) => "Sunucu hatası".to_string(),
            },
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(DbError::from(err))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Error::InvalidCredentials { message } => {
                info!("Login rejected: {message}");
            }
            Error::Forbidden { .. } => {
                debug!("Forbidden: {self}");
            }
            Error::BadRequest { message } => {
                debug!("Bad request: {message}");
            }
            Error::NotFound { resource } => {
                debug!("Not found: {resource}");
            }
            Error::Internal { operation } => {
                error!("Internal error during {operation}");
            }
            Error::Database(db) => match db {
                DbError::Other(inner) => error!("Database error: {inner}"),
                _ => warn!("Database constraint error: {db}"),
            },
            Error::Other(inner) => {
                error!("Unhandled error: {inner:#}");
            }
        }

        (
            status,
            Json(json!({ "success": false, "error": self.user_message() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_defaults_to_turkish_message() {
        let err = Error::Forbidden { message: None };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.user_message(), "Yetkisiz erişim");
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = Error::Internal {
            operation: "hashing the admin password".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "Sunucu hatası");
    }

    #[test]
    fn database_not_found_maps_to_404() {
        let err = Error::Database(DbError::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
