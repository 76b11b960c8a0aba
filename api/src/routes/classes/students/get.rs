use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::enrollment::EnrollmentService;
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::UserResponse;

/// GET /classes/{class_id}/students
///
/// Enrolled students ordered by display name.
pub async fn list_students(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<UserResponse>>>) {
    match EnrollmentService::list_students(app_state.db(), class_id).await {
        Ok(students) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                students.into_iter().map(UserResponse::from).collect(),
                "Students retrieved successfully",
            )),
        ),
        Err(e) => from_app_error(e),
    }
}
