//! `/classes/{class_id}/students`: the class roster, managed by its teacher.

pub mod delete;
pub mod get;
pub mod post;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use util::state::AppState;

use crate::auth::guards::allow_class_owner;
use delete::unenroll_student;
use get::list_students;
use post::enroll_students;

pub fn students_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/", post(enroll_students))
        .route("/{student_id}", delete(unenroll_student))
        .route_layer(from_fn_with_state(app_state, allow_class_owner))
}
