use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::user::{UpdateUser, UserService};
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::UserResponse;

/// PUT /users/{user_id}
///
/// Partial update; absent fields are left unchanged.
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUser>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    match UserService::update(app_state.db(), user_id, req).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user.into(), "User updated successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
