pub mod auth;
pub mod bookings;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use auth::TokenService;
use config::{AppConfig, StoreBackend};
use store::{DocumentStore, InMemoryStore, PgDocumentStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: Arc<TokenService>,
    /// Whether the session cookie carries the `Secure` attribute
    pub cookie_secure: bool,
}

impl AppState {
    /// Acquire the process-wide resources described by `config`
    pub async fn from_config(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let store: Arc<dyn DocumentStore> = match config.database.backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                Arc::new(InMemoryStore::new())
            }
            StoreBackend::Postgres => {
                let url = config.database.url.as_deref().unwrap_or_default();
                tracing::info!("Connecting to database...");
                let pool = db::create_pool(url, config.database.max_connections).await?;
                db::ensure_collections(&pool).await?;
                Arc::new(PgDocumentStore::new(pool))
            }
        };

        Ok(Self {
            store,
            tokens: Arc::new(TokenService::new(config.auth.token_secret.clone())),
            cookie_secure: config.auth.cookie_secure,
        })
    }
}

async fn root_handler() -> &'static str {
    "Hello World"
}

/// Build the CORS layer.
///
/// Cookies only cross origins that are listed explicitly; without a list any
/// origin may call the public endpoints.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Creates and configures the application router.
///
/// Request logging wraps every route; only the bookings listing sits behind
/// the session check.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let authenticated = middleware::from_fn_with_state(state.clone(), auth::require_auth);

    Router::new()
        .route("/", get(root_handler))
        .route("/services", get(services::list_services_handler))
        .route("/services/:id", get(services::get_service_handler))
        .route(
            "/bookings",
            get(bookings::list_bookings_handler)
                .route_layer(authenticated)
                .post(bookings::create_booking_handler),
        )
        .route(
            "/bookings/:id",
            patch(bookings::update_booking_status_handler).delete(bookings::delete_booking_handler),
        )
        .route("/jwt", post(auth::issue_token_handler))
        .route("/logout", post(auth::logout_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
        .with_state(state)
}
