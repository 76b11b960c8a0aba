use crate::attendance::{self, AttendanceReport, RosterEntry};
use crate::attendance_session::AttendanceSessionService;
use crate::enrollment::EnrollmentService;
use crate::service::AppError;
use chrono::SecondsFormat;
use db::models::attendance_log::Model as AttendanceLog;
use sea_orm::DatabaseConnection;

pub struct AttendanceReportService;

impl AttendanceReportService {
    /// Report for a session, computed fresh from enrollments and logs.
    pub async fn report(db: &DatabaseConnection, session_id: i64) -> Result<AttendanceReport, AppError> {
        let session = AttendanceSessionService::find_by_id(db, session_id).await?;
        let roster: Vec<RosterEntry> = EnrollmentService::list_students(db, session.class_id)
            .await?
            .into_iter()
            .map(|u| RosterEntry {
                student_id: u.id,
                display_name: u.display_name().to_owned(),
                username: u.username,
            })
            .collect();
        let logs = AttendanceLog::for_session(db, session.id).await?;

        Ok(attendance::build_report(session.id, &roster, &logs))
    }
}

/// Column header of the CSV export.
pub const CSV_HEADER: &str = "student_id,username,full_name,status,checked_at,latitude,longitude,device_id";

/// Renders a report as CSV, one line per row in report order.
pub fn report_to_csv(report: &AttendanceReport) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for row in &report.rows {
        let checked_at = row
            .checked_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();
        let line = format!(
            "{},{},{},{},{},{},{},{}\n",
            row.student_id,
            esc(&row.username),
            esc(&row.display_name),
            row.status,
            checked_at,
            row.latitude.map(|v| v.to_string()).unwrap_or_default(),
            row.longitude.map(|v| v.to_string()).unwrap_or_default(),
            esc(row.device_id.as_deref().unwrap_or("")),
        );
        csv.push_str(&line);
    }
    csv
}

fn esc(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
