//! Request extractor for the authenticated user.
//!
//! Sessions are tab-scoped: the frontend sends its tab id in the
//! `x-tab-id` header and the matching `auth-token-<tabId>` cookie. Without
//! a tab id the plain `auth-token` cookie is used. The JWT only identifies
//! the user; the row is re-read so role and capability changes apply to
//! in-flight sessions.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use tracing::debug;

use crate::AppState;
use crate::api::models::users::Role;
use crate::auth::session::verify_session_token;
use crate::db::handlers::{Repository, Users};
use crate::db::models::users::UserDBResponse;
use crate::errors::{Error, Result};
use crate::types::UserId;

pub const TAB_ID_HEADER: &str = "x-tab-id";

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub is_customer_service: bool,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_kurye(&self) -> bool {
        self.role == Role::Kurye
    }
}

impl From<&UserDBResponse> for CurrentUser {
    fn from(user: &UserDBResponse) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            name: user.name.clone(),
            is_customer_service: user.is_customer_service,
        }
    }
}

/// Tab ids become part of a cookie name, so only a conservative charset is
/// accepted.
pub fn valid_tab_id(tab_id: &str) -> bool {
    !tab_id.is_empty()
        && tab_id.len() <= 64
        && tab_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn tab_id_from_headers(parts: &Parts) -> Option<&str> {
    let tab_id = parts.headers.get(TAB_ID_HEADER)?.to_str().ok()?;
    if valid_tab_id(tab_id) {
        Some(tab_id)
    } else {
        debug!("Ignoring malformed tab id header");
        None
    }
}

/// Resolve the session for this request, if any. `Ok(None)` means no valid
/// session; errors are reserved for server-side failures.
pub async fn resolve_current_user(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<CurrentUser>> {
    let base = &state.config.auth.session.cookie_name;
    let cookie_name = match tab_id_from_headers(parts) {
        Some(tab_id) => format!("{base}-{tab_id}"),
        None => base.clone(),
    };

    let Some(cookie_header) = parts.headers.get(COOKIE).and_then(|v| v.to_str().ok()) else {
        return Ok(None);
    };

    for pair in cookie_header.split(';') {
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        if name != cookie_name {
            continue;
        }

        let claims = match verify_session_token(value, &state.config) {
            Ok(claims) => claims,
            Err(Error::Forbidden { .. }) => continue,
            Err(err) => return Err(err),
        };

        let mut conn = state.db.acquire().await?;
        let user = Users::new(&mut conn).get_by_id(claims.sub).await?;
        return Ok(user.as_ref().map(CurrentUser::from));
    }

    Ok(None)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        resolve_current_user(parts, state)
            .await?
            .ok_or(Error::Forbidden { message: None })
    }
}

/// Non-rejecting variant for endpoints that report session state instead
/// of requiring one (`/api/auth/check`).
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        Ok(MaybeUser(
            resolve_current_user(parts, state).await.ok().flatten(),
        ))
    }
}
