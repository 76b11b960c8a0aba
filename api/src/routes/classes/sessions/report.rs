use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use services::attendance::AttendanceReport;
use services::attendance_report::{AttendanceReportService, report_to_csv};
use util::state::AppState;

use crate::response::{ApiResponse, Empty, from_app_error};

/// GET /classes/{class_id}/sessions/{session_id}/report
///
/// One row per enrolled student (unlogged students are `ABSENT`) plus a
/// `{ total, present, late, absent }` summary.
pub async fn get_report(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<AttendanceReport>>) {
    match AttendanceReportService::report(app_state.db(), session_id).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(report, "Attendance report generated")),
        ),
        Err(e) => from_app_error(e),
    }
}

/// GET /classes/{class_id}/sessions/{session_id}/report/export
///
/// The report as a CSV attachment.
pub async fn export_report_csv(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
) -> Response {
    let report = match AttendanceReportService::report(app_state.db(), session_id).await {
        Ok(r) => r,
        Err(e) => return from_app_error::<Empty>(e).into_response(),
    };

    let csv = report_to_csv(&report);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"attendance_session_{session_id}.csv\"");
    if let Ok(v) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, v);
    }

    (StatusCode::OK, headers, csv).into_response()
}
