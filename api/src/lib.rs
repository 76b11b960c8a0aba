//! HTTP and WebSocket surface of the attendance service.

pub mod auth;
pub mod response;
pub mod routes;
pub mod ws;

use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware::{from_fn, from_fn_with_state},
};
use tower_http::cors::CorsLayer;
use util::state::AppState;

use crate::auth::{guards::validate_known_ids, middleware::log_request};
use crate::routes::routes;
use crate::ws::ws_routes;

/// The complete application router: `/api` REST routes, `/ws` feeds,
/// request logging and permissive CORS.
pub fn app(app_state: AppState) -> Router {
    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]);

    Router::new()
        .nest(
            "/api",
            routes(app_state.clone())
                .layer(from_fn_with_state(app_state.clone(), validate_known_ids)),
        )
        .nest("/ws", ws_routes(app_state))
        .layer(from_fn(log_request))
        .layer(cors)
}
