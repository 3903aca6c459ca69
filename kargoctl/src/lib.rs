//! # kargoctl: Cargo Tracking Panel Backend
//!
//! `kargoctl` is the backend for a courier company's internal tracking
//! panel. Couriers log batches of returned shipment barcodes and exchange
//! cargos from the field; office staff review those batches, follow up on
//! problem shipments and manage their status until resolution or payout.
//!
//! ## Overview
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum) with
//! SQLite for persistence. Authentication is session-based: a login issues
//! an HS256 JWT stored in an HttpOnly cookie, optionally scoped to a
//! browser tab via the `x-tab-id` header so one operator can be signed in
//! as different accounts in different tabs. Authorization distinguishes
//! couriers, admins and customer-service staff (couriers carrying the
//! `is_customer_service` capability).
//!
//! Multi-row writes (a barcode batch and its barcodes, a problem shipment
//! and its photos) run inside database transactions so partial state never
//! becomes visible.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use kargoctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = kargoctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     kargoctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::str::FromStr;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{delete, get, post, put};
use bon::Builder;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api::models::users::Role;
use crate::auth::password;
use crate::db::handlers::{Repository, Users};
use crate::db::models::users::{UserCreateDBRequest, UserUpdateDBRequest};
use crate::openapi::ApiDoc;

pub use config::Config;
pub use types::{ExchangeCargoId, ProblemCargoId, TransactionId, UserId};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}

/// Get the kargoctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

struct SeedUser {
    username: &'static str,
    password: &'static str,
    role: Role,
    name: &'static str,
    is_customer_service: bool,
}

/// The fixed accounts the panel ships with; the admin account comes from
/// configuration and is seeded separately.
const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        username: "kurye",
        password: "kurye123",
        role: Role::Kurye,
        name: "Kurye",
        is_customer_service: false,
    },
    SeedUser {
        username: "hatipcoskun@verarkargo.com",
        password: "Ht1903.",
        role: Role::Admin,
        name: "Hatip Bey",
        is_customer_service: false,
    },
    SeedUser {
        username: "müsterihizmetleri@verarkargo.com",
        password: "müsteri34",
        role: Role::Kurye,
        name: "Müşteri Hizmetleri",
        is_customer_service: true,
    },
    SeedUser {
        username: "depo1@verarkargo.com",
        password: "Depo34.1",
        role: Role::Kurye,
        name: "Depo1",
        is_customer_service: false,
    },
    SeedUser {
        username: "depo2@verarkargo.com",
        password: "Depo34.2",
        role: Role::Kurye,
        name: "Depo2",
        is_customer_service: false,
    },
    SeedUser {
        username: "depo3@verarkargo.com",
        password: "Depo34.3",
        role: Role::Kurye,
        name: "Depo3",
        is_customer_service: false,
    },
];

async fn hash_password(password: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || password::hash_string(&password))
        .await?
        .map_err(|e| anyhow::anyhow!("failed to hash seed password: {e}"))
}

/// Seed the panel's accounts. Idempotent: existing users are left alone,
/// except that the customer-service account is forced back to the `kurye`
/// role with its capability flag set, in case it was edited by hand.
pub async fn seed_users(config: &Config, pool: &SqlitePool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;

    if Users::new(&mut conn)
        .get_by_username(&config.admin_username)
        .await?
        .is_none()
    {
        let password_hash = hash_password(config.admin_password.clone()).await?;
        Users::new(&mut conn)
            .create(&UserCreateDBRequest {
                username: config.admin_username.clone(),
                password_hash,
                role: Role::Admin,
                name: "Admin".to_string(),
                is_customer_service: false,
            })
            .await?;
        info!(username = %config.admin_username, "Seeded admin user");
    }

    for seed in SEED_USERS {
        let existing = Users::new(&mut conn).get_by_username(seed.username).await?;
        match existing {
            None => {
                let password_hash = hash_password(seed.password.to_string()).await?;
                Users::new(&mut conn)
                    .create(&UserCreateDBRequest {
                        username: seed.username.to_string(),
                        password_hash,
                        role: seed.role,
                        name: seed.name.to_string(),
                        is_customer_service: seed.is_customer_service,
                    })
                    .await?;
                info!(username = seed.username, "Seeded user");
            }
            Some(user)
                if seed.is_customer_service
                    && (user.role != seed.role
                        || user.is_customer_service != seed.is_customer_service) =>
            {
                Users::new(&mut conn)
                    .update(
                        user.id,
                        &UserUpdateDBRequest {
                            role: Some(seed.role),
                            is_customer_service: Some(seed.is_customer_service),
                        },
                    )
                    .await?;
                info!(username = seed.username, "Corrected customer-service account");
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Open the SQLite pool, run migrations and seed the accounts.
pub async fn setup_database(config: &Config) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    migrator().run(&pool).await?;
    seed_users(config, &pool).await?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.auth.cors.allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.auth.cors.allow_credentials)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(auth::current_user::TAB_ID_HEADER),
        ]))
}

/// Build the application router: the JSON API under `/api`, a health
/// endpoint and interactive API docs.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        // Sessions
        .route("/auth/login", post(api::handlers::auth::login))
        .route("/auth/check", get(api::handlers::auth::check))
        .route("/auth/logout", post(api::handlers::auth::logout))
        // Barcode batches
        .route("/barcodes/save", post(api::handlers::barcodes::save_barcodes))
        .route("/barcodes/check", post(api::handlers::barcodes::check_barcode))
        .route(
            "/transactions/list",
            get(api::handlers::transactions::list_transactions),
        )
        .route(
            "/transactions/{id}",
            get(api::handlers::transactions::get_transaction),
        )
        .route(
            "/transactions/{id}/delete",
            delete(api::handlers::transactions::delete_transaction),
        )
        // Exchange cargos
        .route(
            "/exchange-cargos/save",
            post(api::handlers::exchange_cargos::save_exchange_cargo),
        )
        .route(
            "/exchange-cargos/list",
            get(api::handlers::exchange_cargos::list_exchange_cargos),
        )
        .route(
            "/exchange-cargos/{id}/delete",
            delete(api::handlers::exchange_cargos::delete_exchange_cargo),
        )
        // Problem shipments
        .route(
            "/sorunlu-kargolar/save",
            post(api::handlers::problem_cargos::save_problem_cargo),
        )
        .route(
            "/sorunlu-kargolar/list",
            get(api::handlers::problem_cargos::list_problem_cargos),
        )
        .route(
            "/sorunlu-kargolar/{id}",
            get(api::handlers::problem_cargos::get_problem_cargo)
                .put(api::handlers::problem_cargos::update_problem_cargo)
                .delete(api::handlers::problem_cargos::delete_problem_cargo),
        )
        .route(
            "/sorunlu-kargolar/{id}/status",
            put(api::handlers::problem_cargos::update_status),
        )
        .route(
            "/sorunlu-kargolar/{id}/depo-gorusu",
            put(api::handlers::problem_cargos::update_depo_gorusu),
        )
        // Users
        .route("/users/kurye-list", get(api::handlers::users::kurye_list))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let router = router.layer(create_cors_layer(&state.config)?).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct owning the router, configuration and the
/// database pool.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] opens the database, runs migrations
///    and seeds the accounts
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting cargo panel with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;

        let state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .build();
        let router = build_router(state)?;

        Ok(Self {
            router,
            config,
            pool,
        })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Cargo panel listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
