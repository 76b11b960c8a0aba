use chrono::{DateTime, Utc};
use db::models::attendance_log::{AttendanceStatus, Model as AttendanceLog};
use icu_collator::{Collator, CollatorOptions};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// An enrolled student as shown on the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub student_id: i64,
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub student_id: i64,
    pub username: String,
    pub display_name: String,
    pub status: AttendanceStatus,
    pub checked_at: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub present: usize,
    pub late: usize,
    pub absent: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AttendanceReport {
    pub session_id: i64,
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}

/// Projects one row per enrolled student, synthesizing ABSENT where no log
/// exists.
///
/// Logs of students missing from `roster` (unenrolled after checking in)
/// are left out so that `absent = total - present - late` holds.
pub fn build_report(session_id: i64, roster: &[RosterEntry], logs: &[AttendanceLog]) -> AttendanceReport {
    let by_student: HashMap<i64, &AttendanceLog> = logs
        .iter()
        .filter(|log| log.session_id == session_id)
        .map(|log| (log.student_id, log))
        .collect();

    let mut rows: Vec<ReportRow> = roster
        .iter()
        .map(|student| match by_student.get(&student.student_id) {
            Some(log) => ReportRow {
                student_id: student.student_id,
                username: student.username.clone(),
                display_name: student.display_name.clone(),
                status: log.status,
                checked_at: Some(log.checked_at),
                latitude: log.latitude,
                longitude: log.longitude,
                device_id: log.device_id.clone(),
            },
            None => ReportRow {
                student_id: student.student_id,
                username: student.username.clone(),
                display_name: student.display_name.clone(),
                status: AttendanceStatus::Absent,
                checked_at: None,
                latitude: None,
                longitude: None,
                device_id: None,
            },
        })
        .collect();

    let order = NameOrder::new();
    rows.sort_by(|a, b| {
        order
            .compare(&a.display_name, &b.display_name)
            .then(a.student_id.cmp(&b.student_id))
    });

    let mut summary = ReportSummary {
        total: rows.len(),
        ..Default::default()
    };
    for row in &rows {
        match row.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Late => summary.late += 1,
            AttendanceStatus::Absent => {}
        }
    }
    summary.absent = summary.total - summary.present - summary.late;

    AttendanceReport {
        session_id,
        rows,
        summary,
    }
}

/// Display-name ordering under the root collation, so accented and
/// stroked letters sort next to their base letter and case only breaks ties.
pub struct NameOrder {
    collator: Option<Collator>,
}

impl NameOrder {
    pub fn new() -> Self {
        let collator = Collator::try_new(&Default::default(), CollatorOptions::new())
            .map_err(|e| tracing::warn!(error = ?e, "Collator unavailable, ordering names by code point"))
            .ok();
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(c) => c.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
        }
    }
}

impl Default for NameOrder {
    fn default() -> Self {
        Self::new()
    }
}
