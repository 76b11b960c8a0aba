use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::user::UserService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, Empty, from_app_error};

/// DELETE /users/{user_id}
///
/// Removes the account with its enrollments, logs and owned classes.
/// Admins cannot delete themselves.
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    if claims.sub == user_id {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("You cannot delete your own account")),
        );
    }

    match UserService::delete(app_state.db(), user_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty::default(), "User deleted successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
