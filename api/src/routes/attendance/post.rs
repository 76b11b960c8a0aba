use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Deserialize;
use services::attendance::Coordinates;
use services::attendance_log::{AttendanceLogService, CheckInRequest};
use services::service::format_validation_errors;
use util::state::AppState;
use validator::{Validate, ValidationError};

use super::common::{CheckInResponse, outcome_response};
use crate::auth::AuthUser;
use crate::response::{ApiResponse, from_app_error};

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_check_in"))]
pub struct CheckInBody {
    /// Bare token.
    pub qr_code: Option<String>,
    /// Raw JSON string scanned from the QR image.
    pub payload: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    #[validate(length(max = 128, message = "device_id is too long"))]
    pub device_id: Option<String>,
}

fn validate_check_in(body: &CheckInBody) -> Result<(), ValidationError> {
    let blank = |s: &Option<String>| s.as_deref().is_none_or(|v| v.trim().is_empty());
    if blank(&body.qr_code) && blank(&body.payload) {
        return Err(ValidationError::new("qr").with_message("qr_code or payload is required".into()));
    }
    if body.latitude.is_some() != body.longitude.is_some() {
        return Err(ValidationError::new("location")
            .with_message("latitude and longitude must be given together".into()));
    }
    Ok(())
}

/// POST /attendance/check-in
///
/// Records the caller's attendance for the session whose QR code was scanned.
///
/// ### Request Body
/// ```json
/// { "qr_code": "9f1c...", "latitude": -25.7545, "longitude": 28.2314, "device_id": "pixel-7" }
/// ```
/// `payload` (the scanned JSON string) may be sent instead of `qr_code`.
///
/// ### Responses
/// - `201 Created` with the new record; status is `PRESENT` or `LATE`
/// - `400 Bad Request` with `code` `INVALID_OR_EXPIRED_QR`, `SESSION_NOT_ACTIVE` or `OUT_OF_RANGE`
/// - `403 Forbidden` with `code` `NOT_ENROLLED`
/// - `409 Conflict` with `code` `ALREADY_CHECKED_IN` and the existing record
pub async fn check_in(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<CheckInBody>,
) -> (StatusCode, Json<ApiResponse<CheckInResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    let location = match (body.latitude, body.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
        _ => None,
    };
    let req = CheckInRequest {
        student_id: claims.sub,
        qr_code: body.qr_code.filter(|s| !s.trim().is_empty()),
        payload: body.payload.filter(|s| !s.trim().is_empty()),
        location,
        device_id: body.device_id,
    };

    match AttendanceLogService::check_in(app_state.db(), req, Utc::now()).await {
        Ok(outcome) => outcome_response(&app_state, outcome, false).await,
        Err(e) => from_app_error(e),
    }
}
