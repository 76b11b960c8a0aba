//! QR lifecycle of a session: issue, show, stop, resume, delete.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use services::attendance_session::{AttendanceSession, AttendanceSessionService};
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::{QrResponse, SessionResponse};
use crate::ws::attendance::{emit, payload};

#[derive(Debug, Deserialize, Default)]
pub struct QrRequest {
    /// Token lifetime; clamped to the configured maximum.
    pub expiry_minutes: Option<i64>,
}

async fn announce(app_state: &AppState, session: &AttendanceSession) {
    emit::qr_updated(
        app_state.ws(),
        payload::QrUpdated {
            session_id: session.id,
            is_active: session.is_active,
            expires_at: session.qr_expires_at.map(|t| t.to_rfc3339()),
        },
    )
    .await;
}

/// POST /classes/{class_id}/sessions/{session_id}/qr
///
/// Mints a fresh token, replacing any previous one, and activates the session.
///
/// ### Request Body (optional)
/// ```json
/// { "expiry_minutes": 10 }
/// ```
/// Without a body the configured default lifetime is used.
pub async fn issue_qr(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
    body: Option<Json<QrRequest>>,
) -> (StatusCode, Json<ApiResponse<QrResponse>>) {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    match AttendanceSessionService::issue_qr(app_state.db(), session_id, req.expiry_minutes, Utc::now()).await {
        Ok((session, qr)) => {
            announce(&app_state, &session).await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    QrResponse::new(qr, session.is_active),
                    "QR code issued",
                )),
            )
        }
        Err(e) => from_app_error(e),
    }
}

/// GET /classes/{class_id}/sessions/{session_id}/qr
///
/// The current token and payload, for re-displaying the code.
pub async fn get_qr(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<QrResponse>>) {
    let session = match AttendanceSessionService::find_by_id(app_state.db(), session_id).await {
        Ok(s) => s,
        Err(e) => return from_app_error(e),
    };

    match AttendanceSessionService::current_qr(&session) {
        Some(qr) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                QrResponse::new(qr, session.is_active),
                "QR code retrieved",
            )),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("No QR code has been issued for this session")),
        ),
    }
}

/// PUT /classes/{class_id}/sessions/{session_id}/qr/stop
///
/// Stops accepting scans; the token is kept for a later resume.
pub async fn stop_qr(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    match AttendanceSessionService::stop_qr(app_state.db(), session_id).await {
        Ok(session) => {
            announce(&app_state, &session).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(session.into(), "QR code stopped")),
            )
        }
        Err(e) => from_app_error(e),
    }
}

/// PUT /classes/{class_id}/sessions/{session_id}/qr/resume
///
/// Reactivates the session. A missing or expired token is replaced, using
/// the optional `expiry_minutes` body field.
pub async fn resume_qr(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
    body: Option<Json<QrRequest>>,
) -> (StatusCode, Json<ApiResponse<QrResponse>>) {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let now = Utc::now();
    let (session, reissued) =
        match AttendanceSessionService::resume_qr(app_state.db(), session_id, req.expiry_minutes, now).await {
            Ok(r) => r,
            Err(e) => return from_app_error(e),
        };
    announce(&app_state, &session).await;

    let message = if reissued.is_some() {
        "QR code reissued"
    } else {
        "QR code resumed"
    };
    match reissued.or_else(|| AttendanceSessionService::current_qr(&session)) {
        Some(qr) => (
            StatusCode::OK,
            Json(ApiResponse::success(QrResponse::new(qr, session.is_active), message)),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Resumed session has no QR code")),
        ),
    }
}

/// DELETE /classes/{class_id}/sessions/{session_id}/qr
///
/// Discards the token and deactivates the session.
pub async fn delete_qr(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    match AttendanceSessionService::delete_qr(app_state.db(), session_id).await {
        Ok(session) => {
            announce(&app_state, &session).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(session.into(), "QR code deleted")),
            )
        }
        Err(e) => from_app_error(e),
    }
}
