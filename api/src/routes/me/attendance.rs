use axum::{Extension, Json, extract::State, http::StatusCode};
use services::attendance_log::AttendanceLogService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::MyAttendanceResponse;

/// GET /me/attendance
///
/// The caller's own check-ins, newest first, with session and class names.
pub async fn get_my_attendance(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Vec<MyAttendanceResponse>>>) {
    match AttendanceLogService::list_for_student(app_state.db(), claims.sub).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(MyAttendanceResponse::from).collect(),
                "Attendance history retrieved",
            )),
        ),
        Err(e) => from_app_error(e),
    }
}
