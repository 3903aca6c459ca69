//! HTTP API surface: handlers and wire models.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, OptionalFromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::Error;

pub mod handlers;
pub mod models;

/// `axum::Json` bound to the panel's error contract: a body that fails to
/// deserialize answers 400 with the usual `{success: false, error}`
/// envelope instead of axum's plain-text 422.
#[derive(Debug)]
pub struct Json<T>(pub T);

fn bad_request(rejection: JsonRejection) -> Error {
    debug!(detail = %rejection.body_text(), "Malformed request body");
    Error::BadRequest {
        message: "Geçersiz istek gövdesi".to_string(),
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match <axum::Json<T> as FromRequest<S>>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(bad_request(rejection)),
        }
    }
}

impl<S, T> OptionalFromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        match <axum::Json<T> as OptionalFromRequest<S>>::from_request(req, state).await {
            Ok(Some(axum::Json(value))) => Ok(Some(Self(value))),
            Ok(None) => Ok(None),
            Err(rejection) => Err(bad_request(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
