//! Login, session check and logout.

use crate::api::Json;
use axum::extract::State;
use tracing::{info, instrument};

use crate::AppState;
use crate::api::models::auth::{
    AuthCheckResponse, LoginRequest, LoginResponse, LogoutRequest, LogoutResponse,
};
use crate::api::models::users::UserResponse;
use crate::auth::current_user::{MaybeUser, valid_tab_id};
use crate::auth::{password, session};
use crate::config::Config;
use crate::db::handlers::Users;
use crate::errors::{Error, Result};

/// Build the session `Set-Cookie` value. Tab-scoped sessions get their own
/// cookie name so logins in different browser tabs do not clobber each
/// other.
fn create_session_cookie(token: &str, tab_id: Option<&str>, config: &Config) -> String {
    let base = &config.auth.session.cookie_name;
    let name = match tab_id {
        Some(tab_id) => format!("{base}-{tab_id}"),
        None => base.clone(),
    };
    let max_age = config.auth.session.timeout.as_secs();
    let secure = if config.auth.session.cookie_secure {
        "; Secure"
    } else {
        ""
    };
    format!("{name}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}{secure}")
}

fn clear_session_cookie(tab_id: Option<&str>, config: &Config) -> String {
    let base = &config.auth.session.cookie_name;
    let name = match tab_id {
        Some(tab_id) => format!("{base}-{tab_id}"),
        None => base.clone(),
    };
    let secure = if config.auth.session.cookie_secure {
        "; Secure"
    } else {
        ""
    };
    format!("{name}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{secure}")
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful"),
        (status = 400, description = "Missing fields or malformed tab id"),
        (status = 401, description = "Unknown user, wrong password or role mismatch"),
    ),
    tag = "auth"
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<LoginResponse> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(Error::BadRequest {
            message: "Kullanıcı adı, şifre ve rol gereklidir".to_string(),
        });
    }
    if let Some(tab_id) = request.tab_id.as_deref() {
        if !valid_tab_id(tab_id) {
            return Err(Error::BadRequest {
                message: "Geçersiz sekme kimliği".to_string(),
            });
        }
    }

    let mut conn = state.db.acquire().await?;
    let user = Users::new(&mut conn)
        .get_by_username(username)
        .await?
        .ok_or_else(|| Error::InvalidCredentials {
            message: "Kullanıcı bulunamadı".to_string(),
        })?;

    if user.role != request.role {
        return Err(Error::InvalidCredentials {
            message: format!(
                "Kullanıcı bulundu ama rol uyuşmuyor. Kullanıcının rolü: {}, aranan rol: {}",
                user.role.as_str(),
                request.role.as_str()
            ),
        });
    }

    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|_| Error::Internal {
            operation: "verifying the password".to_string(),
        })??;
    if !valid {
        return Err(Error::InvalidCredentials {
            message: "Şifre hatalı".to_string(),
        });
    }

    let token = session::create_session_token(&user, &state.config)?;
    let cookie = create_session_cookie(&token, request.tab_id.as_deref(), &state.config);

    info!(user_id = user.id, "User logged in");

    Ok(LoginResponse {
        user: UserResponse::from(&user),
        cookie,
    })
}

#[utoipa::path(
    get,
    path = "/auth/check",
    responses((status = 200, description = "Session state", body = AuthCheckResponse)),
    tag = "auth"
)]
pub async fn check(MaybeUser(user): MaybeUser) -> Json<AuthCheckResponse> {
    Json(AuthCheckResponse {
        success: user.is_some(),
        user: user.as_ref().map(UserResponse::from),
    })
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = LogoutRequest,
    responses((status = 200, description = "Session cookie cleared")),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    request: Option<Json<LogoutRequest>>,
) -> LogoutResponse {
    let tab_id = request
        .and_then(|Json(r)| r.tab_id)
        .filter(|tab_id| valid_tab_id(tab_id));

    LogoutResponse {
        cookie: clear_session_cookie(tab_id.as_deref(), &state.config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_config;

    #[test]
    fn session_cookie_is_tab_scoped() {
        let config = test_config();
        let cookie = create_session_cookie("tok", Some("tab42"), &config);
        assert!(cookie.starts_with("auth-token-tab42=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));

        let plain = create_session_cookie("tok", None, &config);
        assert!(plain.starts_with("auth-token=tok;"));
    }

    #[test]
    fn clearing_expires_the_cookie() {
        let config = test_config();
        let cookie = clear_session_cookie(None, &config);
        assert!(cookie.starts_with("auth-token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
