//! `/me` routes: data about the signed-in user.

pub mod attendance;

use axum::{Router, routing::get};
use util::state::AppState;

use attendance::get_my_attendance;

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/attendance", get(get_my_attendance))
}
