//! `/classes` routes and the per-class `students` and `sessions` groups.
//!
//! Every route requires authentication (applied by the parent router);
//! per-class access is checked with `allow_class_member` for reads and
//! `allow_class_owner` for writes.

pub mod delete;
pub mod get;
pub mod post;
pub mod put;
pub mod sessions;
pub mod students;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};
use util::state::AppState;

use crate::auth::guards::{allow_class_member, allow_class_owner, allow_teacher};
use delete::delete_class;
use get::{get_class, list_classes};
use post::create_class;
use put::update_class;
use sessions::sessions_routes;
use students::students_routes;

pub fn classes_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes))
        .route("/", post(create_class).route_layer(from_fn(allow_teacher)))
        .route(
            "/{class_id}",
            get(get_class).route_layer(from_fn_with_state(app_state.clone(), allow_class_member)),
        )
        .route(
            "/{class_id}",
            put(update_class).route_layer(from_fn_with_state(app_state.clone(), allow_class_owner)),
        )
        .route(
            "/{class_id}",
            delete(delete_class).route_layer(from_fn_with_state(app_state.clone(), allow_class_owner)),
        )
        .nest("/{class_id}/students", students_routes(app_state.clone()))
        .nest("/{class_id}/sessions", sessions_routes(app_state))
}
