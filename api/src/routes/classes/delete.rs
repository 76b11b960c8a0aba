use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::class::ClassService;
use util::state::AppState;

use crate::response::{ApiResponse, Empty, from_app_error};

/// DELETE /classes/{class_id}
///
/// Removes the class with its enrollments, sessions and their logs.
pub async fn delete_class(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match ClassService::delete(app_state.db(), class_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty::default(), "Class deleted successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
