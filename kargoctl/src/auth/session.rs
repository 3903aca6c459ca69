//! Stateless session tokens (HS256 JWT).
//!
//! The token carries the user id, username and role for debuggability, but
//! only `sub` is trusted: the `CurrentUser` extractor re-reads the user row
//! on every request, so role or capability changes take effect immediately.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::api::models::users::Role;
use crate::config::Config;
use crate::db::models::users::UserDBResponse;
use crate::errors::{Error, Result};
use crate::types::UserId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserId,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

fn secret_key(config: &Config) -> Result<&str> {
    config.secret_key.as_deref().ok_or_else(|| Error::Internal {
        operation: "reading the session secret key".to_string(),
    })
}

pub fn create_session_token(user: &UserDBResponse, config: &Config) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role,
        iat: now,
        exp: now + config.auth.session.timeout.as_secs() as i64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret_key(config)?.as_bytes()),
    )
    .map_err(|_| Error::Internal {
        operation: "signing the session token".to_string(),
    })
}

/// Decode and validate a session token.
///
/// Any client-side failure (expired, tampered, garbage) is `Forbidden`;
/// only a missing server secret is an internal error.
pub fn verify_session_token(token: &str, config: &Config) -> Result<SessionClaims> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret_key(config)?.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| Error::Forbidden { message: None })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_config, test_user_row};

    #[test]
    fn roundtrip_preserves_claims() {
        let config = test_config();
        let user = test_user_row(42, "mehmet", Role::Kurye);

        let token = create_session_token(&user, &config).expect("token creation should succeed");
        let claims = verify_session_token(&token, &config).expect("verification should succeed");

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "mehmet");
        assert_eq!(claims.role, Role::Kurye);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_is_forbidden() {
        let config = test_config();
        let user = test_user_row(1, "admin", Role::Admin);
        let token = create_session_token(&user, &config).expect("token creation should succeed");

        let mut tampered = token.clone();
        tampered.push('x');
        let err = verify_session_token(&tampered, &config).unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));
    }

    #[test]
    fn wrong_secret_is_forbidden() {
        let config = test_config();
        let user = test_user_row(1, "admin", Role::Admin);
        let token = create_session_token(&user, &config).expect("token creation should succeed");

        let mut other = test_config();
        other.secret_key = Some("a-different-secret".to_string());
        assert!(verify_session_token(&token, &other).is_err());
    }

    #[test]
    fn missing_secret_is_internal() {
        let mut config = test_config();
        config.secret_key = None;
        let user = test_user_row(1, "admin", Role::Admin);
        let err = create_session_token(&user, &config).unwrap_err();
        assert!(matches!(err, Error::Internal { .. }));
    }
}
