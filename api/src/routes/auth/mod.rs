//! `/auth` routes: self-service sign-up, login and the current user.

pub mod get;
pub mod post;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::allow_authenticated;
use get::get_me;
use post::{login, register};

/// - `POST /auth/register` → `register`
/// - `POST /auth/login` → `login`
/// - `GET /auth/me` → `get_me`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_me).route_layer(from_fn(allow_authenticated)))
}
