use crate::attendance::{self, CheckInRejection, Coordinates, QrPayload};
use crate::service::AppError;
use chrono::{DateTime, Utc};
use db::models::attendance_log::{Column, Entity, NewAttendanceLog};
use db::models::attendance_session::{Entity as SessionEntity, Model as AttendanceSession};
use db::models::class::Entity as ClassEntity;
use db::models::class_enrollment::Model as Enrollment;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    SqlErr,
};
use serde::Serialize;
use std::collections::HashMap;

pub use db::models::attendance_log::{AttendanceStatus, Model as AttendanceLog};

/// Device id recorded for teacher-entered marks.
pub const MANUAL_DEVICE_ID: &str = "manual";

/// A student's scan as received from the client.
#[derive(Debug, Clone, Default)]
pub struct CheckInRequest {
    pub student_id: i64,
    /// Bare token.
    pub qr_code: Option<String>,
    /// Raw JSON read from the QR image; used when `qr_code` is absent.
    pub payload: Option<String>,
    pub location: Option<Coordinates>,
    pub device_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum CheckInOutcome {
    Accepted {
        log: AttendanceLog,
        session: AttendanceSession,
    },
    Rejected(CheckInRejection),
}

/// A log of the caller with its session and class for display.
#[derive(Debug, Clone, Serialize)]
pub struct StudentAttendanceRow {
    #[serde(flatten)]
    pub log: AttendanceLog,
    pub session_title: String,
    pub session_start_time: DateTime<Utc>,
    pub class_id: i64,
    pub class_code: String,
    pub class_name: String,
}

pub struct AttendanceLogService;

impl AttendanceLogService {
    /// Student QR check-in at `now`.
    ///
    /// Resolves the session by token, applies QR validity, then the ordered
    /// evaluation. Business rejections come back as `Ok(Rejected(..))`.
    pub async fn check_in(
        db: &DatabaseConnection,
        req: CheckInRequest,
        now: DateTime<Utc>,
    ) -> Result<CheckInOutcome, AppError> {
        let Some((token, claimed_session)) = resolve_token(&req) else {
            return Ok(CheckInOutcome::Rejected(CheckInRejection::InvalidOrExpiredQr));
        };

        let session = match AttendanceSession::find_by_qr_code(db, &token).await? {
            Some(s) if claimed_session.is_none_or(|id| id == s.id) => s,
            _ => return Ok(CheckInOutcome::Rejected(CheckInRejection::InvalidOrExpiredQr)),
        };

        if !attendance::is_valid(&session, &token, now) {
            tracing::debug!(session_id = session.id, student_id = req.student_id, "Rejected stale QR");
            return Ok(CheckInOutcome::Rejected(CheckInRejection::InvalidOrExpiredQr));
        }

        Self::record(
            db,
            session,
            req.student_id,
            now,
            req.location,
            req.device_id,
        )
        .await
    }

    /// Teacher mark for `student_id`, bypassing QR validity and geofence.
    pub async fn mark_manual(
        db: &DatabaseConnection,
        session_id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<CheckInOutcome, AppError> {
        let session = SessionEntity::find_by_id(session_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attendance session {session_id} not found")))?;

        Self::record(
            db,
            session,
            student_id,
            now,
            None,
            Some(MANUAL_DEVICE_ID.to_owned()),
        )
        .await
    }

    async fn record(
        db: &DatabaseConnection,
        session: AttendanceSession,
        student_id: i64,
        now: DateTime<Utc>,
        location: Option<Coordinates>,
        device_id: Option<String>,
    ) -> Result<CheckInOutcome, AppError> {
        let enrolled = Enrollment::is_enrolled(db, session.class_id, student_id).await?;
        let existing = AttendanceLog::find_for(db, session.id, student_id).await?;

        let status = match attendance::evaluate(&session, enrolled, existing.as_ref(), now, location) {
            Ok(status) => status,
            Err(rejection) => {
                tracing::debug!(
                    session_id = session.id,
                    student_id,
                    reason = rejection.code(),
                    "Check-in rejected"
                );
                return Ok(CheckInOutcome::Rejected(rejection));
            }
        };

        let new = NewAttendanceLog {
            session_id: session.id,
            student_id,
            status,
            checked_at: now,
            latitude: location.map(|c| c.latitude),
            longitude: location.map(|c| c.longitude),
            device_id,
        };

        Self::insert(db, session, new).await
    }

    /// Writes an evaluated check-in. A unique-index violation means another
    /// scan for the same pair landed after evaluation; the stored log is
    /// returned as `ALREADY_CHECKED_IN`.
    async fn insert(
        db: &DatabaseConnection,
        session: AttendanceSession,
        new: NewAttendanceLog,
    ) -> Result<CheckInOutcome, AppError> {
        let student_id = new.student_id;
        match AttendanceLog::create(db, new).await {
            Ok(log) => {
                tracing::info!(
                    session_id = session.id,
                    student_id,
                    status = %log.status,
                    "Check-in recorded"
                );
                Ok(CheckInOutcome::Accepted { log, session })
            }
            Err(err) if is_unique_violation(&err) => {
                let existing = AttendanceLog::find_for(db, session.id, student_id)
                    .await?
                    .ok_or(AppError::Database(err))?;
                tracing::debug!(session_id = session.id, student_id, "Concurrent duplicate check-in");
                Ok(CheckInOutcome::Rejected(CheckInRejection::AlreadyCheckedIn(
                    Box::new(existing),
                )))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Logs of a session, newest first.
    pub async fn list_for_session(
        db: &DatabaseConnection,
        session_id: i64,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<AttendanceLog>, u64), AppError> {
        let paginator = Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_desc(Column::CheckedAt)
            .order_by_desc(Column::Id)
            .paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let logs = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((logs, total))
    }

    /// Every log of `student_id`, newest first, with session and class names.
    pub async fn list_for_student(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Vec<StudentAttendanceRow>, AppError> {
        let logs = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CheckedAt)
            .find_also_related(SessionEntity)
            .all(db)
            .await?;

        let class_ids: Vec<i64> = logs
            .iter()
            .filter_map(|(_, s)| s.as_ref().map(|s| s.class_id))
            .collect();
        let classes: HashMap<i64, db::models::class::Model> = ClassEntity::find()
            .filter(db::models::class::Column::Id.is_in(class_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(logs
            .into_iter()
            .filter_map(|(log, session)| {
                let session = session?;
                let class = classes.get(&session.class_id)?;
                Some(StudentAttendanceRow {
                    log,
                    session_title: session.title,
                    session_start_time: session.start_time,
                    class_id: class.id,
                    class_code: class.code.clone(),
                    class_name: class.name.clone(),
                })
            })
            .collect())
    }
}

/// The token named by the request and, for payload scans, the session id
/// the payload claims.
fn resolve_token(req: &CheckInRequest) -> Option<(String, Option<i64>)> {
    if let Some(code) = req.qr_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        return Some((code.to_owned(), None));
    }
    let raw = req.payload.as_deref()?;
    let payload = QrPayload::parse(raw.trim())?;
    Some((payload.qr_code, Some(payload.session_id)))
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
