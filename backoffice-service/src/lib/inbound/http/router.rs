use std::sync::Arc;

use auth::TokenAuthority;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;

use super::audit::audit;
use super::handlers::health::health;
use super::handlers::health::root;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::stats::stats;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::domain::user::ports::UserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<TokenAuthority>,
    pub users: Arc<dyn UserDirectory>,
    /// Advertised token lifetime, seconds
    pub token_expire_seconds: i64,
    pub trust_proxy_headers: bool,
}

pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh));

    let protected_routes = Router::new().route("/api/auth/me", get(me)).route_layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    // Guard ordering: authenticate runs first, then the role check.
    let admin_routes = Router::new()
        .route("/api/admin/stats", get(stats))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // The audit layer is added last so it is outermost: every request,
    // including CORS preflights and rejected ones, passes through it.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(cors_layer(allowed_origins))
        .layer(middleware::from_fn_with_state(state.clone(), audit))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
