use axum::{Extension, Json, extract::State, http::StatusCode};
use services::user::UserService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::UserResponse;

/// GET /auth/me
///
/// The account behind the bearer token.
pub async fn get_me(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    match UserService::find_by_id(app_state.db(), claims.sub).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user.into(), "User data retrieved successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
