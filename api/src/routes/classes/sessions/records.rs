use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use services::attendance_log::AttendanceLogService;
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};
use crate::routes::attendance::common::{CheckInResponse, outcome_response};
use crate::routes::common::{AttendanceLogResponse, Paginated, PaginationQuery};

/// GET /classes/{class_id}/sessions/{session_id}/records
///
/// Raw check-in logs, newest first.
pub async fn list_records(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
    Query(query): Query<PaginationQuery>,
) -> (StatusCode, Json<ApiResponse<Paginated<AttendanceLogResponse>>>) {
    let (page, per_page) = query.resolve();
    match AttendanceLogService::list_for_session(app_state.db(), session_id, page, per_page).await {
        Ok((logs, total)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Paginated {
                    items: logs.into_iter().map(AttendanceLogResponse::from).collect(),
                    page,
                    per_page,
                    total,
                },
                "Attendance records retrieved",
            )),
        ),
        Err(e) => from_app_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub student_id: i64,
}

/// POST /classes/{class_id}/sessions/{session_id}/records
///
/// Teacher marks a student present without a scan. QR validity and the
/// geofence are not checked; enrollment, duplicates and the session window
/// are. Recorded with `device_id = "manual"`.
///
/// ### Request Body
/// ```json
/// { "student_id": 12 }
/// ```
pub async fn mark_attendance(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
    Json(req): Json<MarkAttendanceRequest>,
) -> (StatusCode, Json<ApiResponse<CheckInResponse>>) {
    match AttendanceLogService::mark_manual(app_state.db(), session_id, req.student_id, Utc::now()).await {
        Ok(outcome) => outcome_response(&app_state, outcome, true).await,
        Err(e) => from_app_error(e),
    }
}
