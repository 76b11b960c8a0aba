//! Check-in decision procedure.
//!
//! Every function here is pure: the caller loads the session, the
//! enrollment flag and any existing log, and passes the scan time in.

use chrono::{DateTime, Duration, Utc};
use db::models::attendance_log::{AttendanceStatus, Model as AttendanceLog};
use db::models::attendance_session::Model as AttendanceSession;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geo::haversine;

/// A GPS fix reported by the scanning device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a check-in was refused. These are expected outcomes, not failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckInRejection {
    #[error("QR code is invalid, expired, or inactive")]
    InvalidOrExpiredQr,

    #[error("You are not enrolled in this class")]
    NotEnrolled,

    /// Carries the log that already exists.
    #[error("You have already checked in for this session")]
    AlreadyCheckedIn(Box<AttendanceLog>),

    #[error("Attendance session is not active at this time")]
    SessionNotActive,

    #[error(
        "You are {distance_meters:.0}m from the class location; check-in requires being within {radius_meters:.0}m"
    )]
    OutOfRange {
        distance_meters: f64,
        radius_meters: f64,
    },
}

impl CheckInRejection {
    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            CheckInRejection::InvalidOrExpiredQr => "INVALID_OR_EXPIRED_QR",
            CheckInRejection::NotEnrolled => "NOT_ENROLLED",
            CheckInRejection::AlreadyCheckedIn(_) => "ALREADY_CHECKED_IN",
            CheckInRejection::SessionNotActive => "SESSION_NOT_ACTIVE",
            CheckInRejection::OutOfRange { .. } => "OUT_OF_RANGE",
        }
    }
}

/// Runs the ordered preconditions and classifies an accepted scan.
///
/// The order is enrollment, duplicate, time window, geofence. The geofence
/// is skipped when the session has none or `location` is `None`.
pub fn evaluate(
    session: &AttendanceSession,
    enrolled: bool,
    existing: Option<&AttendanceLog>,
    timestamp: DateTime<Utc>,
    location: Option<Coordinates>,
) -> Result<AttendanceStatus, CheckInRejection> {
    if !enrolled {
        return Err(CheckInRejection::NotEnrolled);
    }

    if let Some(log) = existing {
        return Err(CheckInRejection::AlreadyCheckedIn(Box::new(log.clone())));
    }

    if timestamp < session.start_time || timestamp > session.end_time {
        return Err(CheckInRejection::SessionNotActive);
    }

    if let (Some(fence), Some(at)) = (session.geofence(), location) {
        let distance = haversine(fence.lat, fence.lng, at.latitude, at.longitude);
        if distance > fence.radius_meters {
            return Err(CheckInRejection::OutOfRange {
                distance_meters: distance,
                radius_meters: fence.radius_meters,
            });
        }
    }

    Ok(classify(session, timestamp))
}

/// PRESENT up to and including `start_time + late_threshold`, LATE after.
pub fn classify(session: &AttendanceSession, timestamp: DateTime<Utc>) -> AttendanceStatus {
    let cutoff = session.start_time + Duration::minutes(i64::from(session.late_threshold_minutes));
    if timestamp <= cutoff {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::Late
    }
}
