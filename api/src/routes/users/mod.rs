//! `/users` routes, admin only (guard applied by the parent router).

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use util::state::AppState;

use delete::delete_user;
use get::{get_user, list_users};
use post::create_user;
use put::update_user;

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/{user_id}", get(get_user))
        .route("/{user_id}", put(update_user))
        .route("/{user_id}", delete(delete_user))
}
