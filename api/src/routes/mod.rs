//! Route groups mounted under `/api`.

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::routes::{
    attendance::attendance_routes, auth::auth_routes, classes::classes_routes,
    health::health_routes, me::me_routes, users::users_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod health;
pub mod me;
pub mod users;

pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/users", users_routes().route_layer(from_fn(allow_admin)))
        .nest(
            "/classes",
            classes_routes(app_state.clone()).route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/me", me_routes().route_layer(from_fn(allow_authenticated)))
        .with_state(app_state)
}
