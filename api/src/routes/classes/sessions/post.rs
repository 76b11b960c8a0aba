use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::attendance_session::{AttendanceSessionService, CreateAttendanceSession};
use services::class::ClassService;
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::SessionResponse;

/// POST /classes/{class_id}/sessions
///
/// Creates an inactive session without a QR code, owned by the class teacher.
///
/// ### Request Body
/// ```json
/// {
///   "title": "Lecture 3",
///   "start_time": "2025-03-01T08:00:00Z",
///   "end_time": "2025-03-01T10:00:00Z",
///   "location_lat": -25.7545,
///   "location_lng": 28.2314,
///   "radius_meters": 50,
///   "late_threshold_minutes": 10
/// }
/// ```
/// The geofence fields are all-or-none; `late_threshold_minutes` defaults
/// to the configured value.
pub async fn create_session(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
    Json(req): Json<CreateAttendanceSession>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    let db = app_state.db();
    let class = match ClassService::find_by_id(db, class_id).await {
        Ok(c) => c,
        Err(e) => return from_app_error(e),
    };

    match AttendanceSessionService::create(db, class.id, class.teacher_id, req).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(session.into(), "Attendance session created")),
        ),
        Err(e) => from_app_error(e),
    }
}
