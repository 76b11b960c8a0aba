use axum::{Json, extract::State, http::StatusCode};
use services::user::{CreateUser, UserService};
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::UserResponse;

/// POST /users
///
/// Creates an account with any role.
///
/// ### Request Body
/// ```json
/// { "username": "t1", "email": "t1@example.com", "full_name": "Dr T", "password": "secret123", "role": "teacher" }
/// ```
pub async fn create_user(
    State(app_state): State<AppState>,
    Json(req): Json<CreateUser>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    match UserService::create(app_state.db(), req).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(user.into(), "User created successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
