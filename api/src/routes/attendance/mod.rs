//! `/attendance` routes: student QR check-in.

pub mod common;
pub mod post;

use axum::{Router, routing::post};
use util::state::AppState;

use post::check_in;

/// - `POST /attendance/check-in` → `check_in`
pub fn attendance_routes() -> Router<AppState> {
    Router::new().route("/check-in", post(check_in))
}
