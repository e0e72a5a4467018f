//! HTTP routes for Company Service.
//!
//! Defines the Axum router and application state.

use crate::auth::TokenValidator;
use crate::config::Config;
use crate::handlers;
use crate::middleware::{
    envelope_bare_errors, http_metrics_middleware, log_request_boundaries,
    require_allowed_country, require_auth, tag_request_id, AuthState, CountryState,
};
use crate::services::CountryDetector;
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,

    /// Bearer token validator for restricted routes.
    pub token_validator: Arc<dyn TokenValidator>,

    /// Geo-IP lookup for restricted routes.
    pub country_detector: Arc<dyn CountryDetector>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Health check (database ping) - public
/// - `/metrics` - Prometheus metrics - public
/// - `GET /api/v1/companies/:company_id` - Get a company - public
/// - `POST /api/v1/search/companies` - Search companies by ID - public
/// - `POST /api/v1/companies` - Create a company - bearer token + country
/// - `DELETE /api/v1/companies/:company_id` - Delete a company - bearer token + country
/// - 30 second request timeout
/// - `{"error": ...}` bodies for unmatched routes, unsupported methods, and timeouts
///
/// The server must be started with `into_make_service_with_connect_info::<SocketAddr>()`
/// so the country check can read the caller's address.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState {
        token_validator: state.token_validator.clone(),
    });
    let country_state = Arc::new(CountryState {
        country_detector: state.country_detector.clone(),
        allowed_country_name: state.config.geoip.allowed_country_name.clone(),
    });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/companies/:company_id", get(handlers::get_company))
        .route("/api/v1/search/companies", post(handlers::search_companies))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Restricted routes
    // Route layer order (bottom-to-top execution):
    // 1. require_auth
    // 2. require_allowed_country
    let restricted_routes = Router::new()
        .route("/api/v1/companies", post(handlers::create_company))
        .route(
            "/api/v1/companies/:company_id",
            delete(handlers::delete_company),
        )
        .route_layer(middleware::from_fn_with_state(
            country_state,
            require_allowed_country,
        ))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(state);

    // Merge routes and apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. http_metrics_middleware - Record ALL responses (outermost)
    // 2. tag_request_id - Request id extension, span, and response header
    // 3. log_request_boundaries - REQUEST_STARTED / REQUEST_COMPLETED
    // 4. envelope_bare_errors - JSON envelope for 404/405/408 from the framework
    // 5. TimeoutLayer - Timeout the request (innermost)
    public_routes
        .merge(metrics_routes)
        .merge(restricted_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(envelope_bare_errors))
        .layer(middleware::from_fn(log_request_boundaries))
        .layer(middleware::from_fn(tag_request_id))
        .layer(middleware::from_fn(http_metrics_middleware))
}
