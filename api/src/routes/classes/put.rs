use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::class::{ClassService, UpdateClass};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::ClassResponse;

/// PUT /classes/{class_id}
///
/// Partial update. `"description": null` clears the description; only
/// admins may reassign `teacher_id`.
pub async fn update_class(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<UpdateClass>,
) -> (StatusCode, Json<ApiResponse<ClassResponse>>) {
    if req.teacher_id.is_some() && !claims.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Only admins may reassign a class")),
        );
    }

    match ClassService::update(app_state.db(), class_id, req).await {
        Ok(class) => (
            StatusCode::OK,
            Json(ApiResponse::success(class.into(), "Class updated successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
