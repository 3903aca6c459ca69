//! Shared helpers for tests: config, seeded users and a test server with
//! cookie persistence.

use axum_test::TestServer;
use sqlx::SqlitePool;

use crate::api::models::users::Role;
use crate::auth::password;
use crate::config::Config;
use crate::db::handlers::{Repository, Users};
use crate::db::models::users::{UserCreateDBRequest, UserDBResponse};
use crate::types::UserId;
use crate::{AppState, build_router};

pub fn test_config() -> Config {
    Config {
        secret_key: Some("test-secret-key".to_string()),
        ..Config::default()
    }
}

/// In-memory user row for unit tests that never touch the database.
pub fn test_user_row(id: UserId, username: &str, role: Role) -> UserDBResponse {
    UserDBResponse {
        id,
        username: username.to_string(),
        password_hash: "unused".to_string(),
        role,
        name: username.to_string(),
        is_customer_service: false,
        created_at: chrono::NaiveDateTime::default(),
    }
}

pub async fn create_test_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    role: Role,
    is_customer_service: bool,
) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("failed to acquire connection");
    Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            username: username.to_string(),
            password_hash: password::hash_string(password).expect("failed to hash password"),
            role,
            name: username.to_string(),
            is_customer_service,
        })
        .await
        .expect("failed to create test user")
}

/// Test server over the full router, persisting cookies across requests so
/// a login call authenticates everything that follows.
pub fn test_server(pool: &SqlitePool) -> TestServer {
    let state = AppState::builder()
        .db(pool.clone())
        .config(test_config())
        .build();
    let router = build_router(state).expect("failed to build router");
    let mut server = TestServer::new(router).expect("failed to create test server");
    server.save_cookies();
    server
}

pub async fn login_as(server: &TestServer, username: &str, password: &str, role: Role) {
    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "username": username,
            "password": password,
            "role": role.as_str(),
        }))
        .await;
    response.assert_status_ok();
}
