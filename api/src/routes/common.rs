//! Response shapes and query helpers shared by the route groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use services::attendance_log::{AttendanceLog, StudentAttendanceRow};
use services::attendance_session::{AttendanceSession, QrIssue, SessionWithCounts};
use services::class::Class;
use services::user::User;

const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 100;

#[derive(Debug, Deserialize, Default)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PaginationQuery {
    /// 1-based page and a page size clamped to `[1, 100]`.
    pub fn resolve(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            total: 0,
        }
    }
}

fn rfc3339(t: DateTime<Utc>) -> String {
    t.to_rfc3339()
}

#[derive(Debug, Serialize, Default)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub display_name: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            display_name: user.display_name().to_owned(),
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role.to_string(),
            created_at: rfc3339(user.created_at),
            updated_at: rfc3339(user.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ClassResponse {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Class> for ClassResponse {
    fn from(class: Class) -> Self {
        Self {
            id: class.id,
            code: class.code,
            name: class.name,
            description: class.description,
            teacher_id: class.teacher_id,
            created_at: rfc3339(class.created_at),
            updated_at: rfc3339(class.updated_at),
        }
    }
}

/// A session without its token; the token is only served by the QR routes.
#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub id: i64,
    pub class_id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub qr_expires_at: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub radius_meters: Option<f64>,
    pub late_threshold_minutes: i32,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled_count: Option<u64>,
}

impl From<AttendanceSession> for SessionResponse {
    fn from(s: AttendanceSession) -> Self {
        Self {
            id: s.id,
            class_id: s.class_id,
            teacher_id: s.teacher_id,
            title: s.title,
            start_time: rfc3339(s.start_time),
            end_time: rfc3339(s.end_time),
            is_active: s.is_active,
            qr_expires_at: s.qr_expires_at.map(rfc3339),
            location_lat: s.location_lat,
            location_lng: s.location_lng,
            radius_meters: s.radius_meters,
            late_threshold_minutes: s.late_threshold_minutes,
            created_at: rfc3339(s.created_at),
            updated_at: rfc3339(s.updated_at),
            checked_in_count: None,
            enrolled_count: None,
        }
    }
}

impl From<SessionWithCounts> for SessionResponse {
    fn from(row: SessionWithCounts) -> Self {
        Self {
            checked_in_count: Some(row.checked_in_count),
            enrolled_count: Some(row.enrolled_count),
            ..Self::from(row.session)
        }
    }
}

#[derive(Debug, Serialize, Default, Clone)]
pub struct AttendanceLogResponse {
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub status: String,
    pub checked_at: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device_id: Option<String>,
}

impl From<AttendanceLog> for AttendanceLogResponse {
    fn from(log: AttendanceLog) -> Self {
        Self {
            id: log.id,
            session_id: log.session_id,
            student_id: log.student_id,
            status: log.status.to_string(),
            checked_at: rfc3339(log.checked_at),
            latitude: log.latitude,
            longitude: log.longitude,
            device_id: log.device_id,
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct QrResponse {
    pub session_id: i64,
    pub qr_code: String,
    pub expires_at: String,
    /// JSON to render into the QR image.
    pub payload: String,
    pub is_active: bool,
}

impl QrResponse {
    pub fn new(qr: QrIssue, is_active: bool) -> Self {
        Self {
            session_id: qr.session_id,
            qr_code: qr.token,
            expires_at: rfc3339(qr.expires_at),
            payload: qr.payload,
            is_active,
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct MyAttendanceResponse {
    #[serde(flatten)]
    pub log: AttendanceLogResponse,
    pub session_title: String,
    pub session_start_time: String,
    pub class_id: i64,
    pub class_code: String,
    pub class_name: String,
}

impl From<StudentAttendanceRow> for MyAttendanceResponse {
    fn from(row: StudentAttendanceRow) -> Self {
        Self {
            log: row.log.into(),
            session_title: row.session_title,
            session_start_time: rfc3339(row.session_start_time),
            class_id: row.class_id,
            class_code: row.class_code,
            class_name: row.class_name,
        }
    }
}
