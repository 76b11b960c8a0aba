//! `/classes/{class_id}/sessions`: attendance sessions of a class, their QR
//! lifecycle, records and reports.
//!
//! Enrolled students may read sessions; everything else is for the class
//! teacher (or an admin).

pub mod delete;
pub mod get;
pub mod post;
pub mod put;
pub mod qr;
pub mod records;
pub mod report;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use util::state::AppState;

use crate::auth::guards::{allow_class_member, allow_class_owner};
use delete::delete_session;
use get::{get_session, list_sessions};
use post::create_session;
use put::update_session;
use qr::{delete_qr, get_qr, issue_qr, resume_qr, stop_qr};
use records::{list_records, mark_attendance};
use report::{export_report_csv, get_report};

pub fn sessions_routes(app_state: AppState) -> Router<AppState> {
    let member = || from_fn_with_state(app_state.clone(), allow_class_member);
    let owner = || from_fn_with_state(app_state.clone(), allow_class_owner);

    Router::new()
        .route("/", get(list_sessions).route_layer(member()))
        .route("/", post(create_session).route_layer(owner()))
        .route("/{session_id}", get(get_session).route_layer(member()))
        .route("/{session_id}", put(update_session).route_layer(owner()))
        .route("/{session_id}", delete(delete_session).route_layer(owner()))
        .route("/{session_id}/qr", get(get_qr).route_layer(owner()))
        .route("/{session_id}/qr", post(issue_qr).route_layer(owner()))
        .route("/{session_id}/qr", delete(delete_qr).route_layer(owner()))
        .route("/{session_id}/qr/stop", put(stop_qr).route_layer(owner()))
        .route("/{session_id}/qr/resume", put(resume_qr).route_layer(owner()))
        .route("/{session_id}/records", get(list_records).route_layer(owner()))
        .route("/{session_id}/records", post(mark_attendance).route_layer(owner()))
        .route("/{session_id}/report", get(get_report).route_layer(owner()))
        .route("/{session_id}/report/export", get(export_report_csv).route_layer(owner()))
}
