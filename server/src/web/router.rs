use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use super::app_state::AppState;
use super::rest_api;

/// Build the axum router with the three query routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/server", axum::routing::post(rest_api::query_server))
        .route("/channels", axum::routing::post(rest_api::query_channels))
        .route("/roles", axum::routing::post(rest_api::query_roles))
        .layer(cors)
        .with_state(state)
}
