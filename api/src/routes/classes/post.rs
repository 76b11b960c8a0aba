use axum::{Extension, Json, extract::State, http::StatusCode};
use services::class::{ClassService, CreateClass};
use services::user::UserService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::ClassResponse;

/// POST /classes
///
/// A teacher becomes the owner of the new class; an admin must name the
/// owning teacher in `teacher_id`.
///
/// ### Request Body
/// ```json
/// { "code": "COS301", "name": "Software Engineering", "description": "Mon 08:30" }
/// ```
pub async fn create_class(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateClass>,
) -> (StatusCode, Json<ApiResponse<ClassResponse>>) {
    let db = app_state.db();
    let actor = match UserService::find_by_id(db, claims.sub).await {
        Ok(user) => user,
        Err(e) => return from_app_error(e),
    };

    match ClassService::create(db, &actor, req).await {
        Ok(class) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(class.into(), "Class created successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
