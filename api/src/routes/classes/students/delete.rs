use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::enrollment::EnrollmentService;
use util::state::AppState;

use crate::response::{ApiResponse, Empty, from_app_error};

/// DELETE /classes/{class_id}/students/{student_id}
///
/// Existing attendance logs of the student are kept.
pub async fn unenroll_student(
    State(app_state): State<AppState>,
    Path((class_id, student_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match EnrollmentService::unenroll(app_state.db(), class_id, student_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty::default(), "Student unenrolled successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
