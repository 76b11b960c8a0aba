use axum::{Json, http::StatusCode};
use serde::Serialize;
use services::attendance::CheckInRejection;
use services::attendance_log::{AttendanceLog, CheckInOutcome};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::AttendanceLogResponse;
use crate::ws::attendance::{emit, payload};

/// Body of both accepted and rejected check-ins.
///
/// `code` is set on rejections; `record` is the new log on success and the
/// existing one for `ALREADY_CHECKED_IN`.
#[derive(Debug, Serialize, Default)]
pub struct CheckInResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<AttendanceLogResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
}

pub fn rejection_status(rejection: &CheckInRejection) -> StatusCode {
    match rejection {
        CheckInRejection::InvalidOrExpiredQr => StatusCode::BAD_REQUEST,
        CheckInRejection::NotEnrolled => StatusCode::FORBIDDEN,
        CheckInRejection::AlreadyCheckedIn(_) => StatusCode::CONFLICT,
        CheckInRejection::SessionNotActive => StatusCode::BAD_REQUEST,
        CheckInRejection::OutOfRange { .. } => StatusCode::BAD_REQUEST,
    }
}

fn rejection_response(rejection: CheckInRejection) -> (StatusCode, Json<ApiResponse<CheckInResponse>>) {
    let status = rejection_status(&rejection);
    let message = rejection.to_string();
    let mut body = CheckInResponse {
        code: Some(rejection.code()),
        ..Default::default()
    };
    match rejection {
        CheckInRejection::AlreadyCheckedIn(existing) => {
            body.record = Some(AttendanceLogResponse::from(*existing));
        }
        CheckInRejection::OutOfRange {
            distance_meters,
            radius_meters,
        } => {
            body.distance_meters = Some(distance_meters.round());
            body.radius_meters = Some(radius_meters);
        }
        _ => {}
    }
    (status, Json(ApiResponse::failure(body, message)))
}

async fn broadcast_checked_in(app_state: &AppState, log: &AttendanceLog, manual: bool) {
    let count = match AttendanceLog::count_for_session(app_state.db(), log.session_id).await {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, session_id = log.session_id, "Failed to count check-ins");
            return;
        }
    };
    emit::checked_in(
        app_state.ws(),
        payload::CheckedIn {
            session_id: log.session_id,
            student_id: log.student_id,
            status: log.status.to_string(),
            checked_at: log.checked_at.to_rfc3339(),
            count,
            manual,
        },
    )
    .await;
}

/// Turns a check-in outcome into the HTTP response, broadcasting accepted
/// check-ins on the session topic.
pub async fn outcome_response(
    app_state: &AppState,
    outcome: CheckInOutcome,
    manual: bool,
) -> (StatusCode, Json<ApiResponse<CheckInResponse>>) {
    match outcome {
        CheckInOutcome::Accepted { log, session } => {
            broadcast_checked_in(app_state, &log, manual).await;
            let message = format!("Checked in as {}", log.status);
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    CheckInResponse {
                        record: Some(log.into()),
                        session_title: Some(session.title),
                        ..Default::default()
                    },
                    message,
                )),
            )
        }
        CheckInOutcome::Rejected(rejection) => rejection_response(rejection),
    }
}
