use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use services::enrollment::{EnrollSummary, EnrollmentService};
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub student_ids: Vec<i64>,
}

/// POST /classes/{class_id}/students
///
/// ### Request Body
/// ```json
/// { "student_ids": [4, 5, 6] }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ enrolled, skipped }`; `skipped` lists ids already enrolled
/// - `400 Bad Request` if any id is not a student
pub async fn enroll_students(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
    Json(req): Json<EnrollRequest>,
) -> (StatusCode, Json<ApiResponse<EnrollSummary>>) {
    match EnrollmentService::enroll(app_state.db(), class_id, &req.student_ids).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ApiResponse::success(summary, "Students enrolled successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
