use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::attendance_session::{AttendanceSessionService, UpdateAttendanceSession};
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::SessionResponse;

/// PUT /classes/{class_id}/sessions/{session_id}
///
/// Partial update of title, window, geofence and late threshold.
/// `"clear_geofence": true` removes the geofence.
pub async fn update_session(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateAttendanceSession>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    match AttendanceSessionService::update(app_state.db(), session_id, req).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(session.into(), "Attendance session updated")),
        ),
        Err(e) => from_app_error(e),
    }
}
