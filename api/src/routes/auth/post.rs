use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use services::service::format_validation_errors;
use services::user::{User, UserService};
use util::state::AppState;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::UserResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "Username cannot be empty"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    pub full_name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email.
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: String,
}

fn issue(user: User) -> Result<AuthResponse, (StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let (token, expires_at) = generate_jwt(user.id, user.role).map_err(|e| {
        tracing::error!(error = %e, user_id = user.id, "Token encoding failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to issue token")),
        )
    })?;
    Ok(AuthResponse {
        user: user.into(),
        token,
        expires_at,
    })
}

/// POST /auth/register
///
/// Creates a student account and signs it in.
///
/// ### Request Body
/// ```json
/// { "username": "u1", "email": "u1@example.com", "full_name": "Ann", "password": "secret123" }
/// ```
///
/// ### Responses
/// - `201 Created` with `{ user, token, expires_at }`
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when the username or email is taken
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> (StatusCode, Json<ApiResponse<AuthResponse>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    let user = match UserService::register(
        app_state.db(),
        &req.username,
        &req.email,
        &req.full_name,
        &req.password,
    )
    .await
    {
        Ok(user) => user,
        Err(e) => return from_app_error(e),
    };

    match issue(user) {
        Ok(body) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(body, "User registered successfully")),
        ),
        Err(resp) => resp,
    }
}

/// POST /auth/login
///
/// ### Request Body
/// ```json
/// { "username": "u1", "password": "secret123" }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ user, token, expires_at }`
/// - `401 Unauthorized` on bad credentials
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<AuthResponse>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    let user = match UserService::login(app_state.db(), &req.username, &req.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Invalid username or password")),
            );
        }
        Err(e) => return from_app_error(e),
    };

    match issue(user) {
        Ok(body) => (
            StatusCode::OK,
            Json(ApiResponse::success(body, "Login successful")),
        ),
        Err(resp) => resp,
    }
}
