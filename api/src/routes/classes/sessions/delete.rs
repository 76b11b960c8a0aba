use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::attendance_session::AttendanceSessionService;
use util::state::AppState;

use crate::response::{ApiResponse, Empty, from_app_error};
use crate::ws::attendance::{emit, payload};

/// DELETE /classes/{class_id}/sessions/{session_id}
///
/// Removes the session and its logs, then tells live dashboards.
pub async fn delete_session(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match AttendanceSessionService::delete(app_state.db(), session_id).await {
        Ok(()) => {
            emit::session_deleted(app_state.ws(), payload::SessionDeleted { session_id }).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(Empty::default(), "Attendance session deleted")),
            )
        }
        Err(e) => from_app_error(e),
    }
}
