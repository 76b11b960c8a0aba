use crate::attendance::{self, QrPayload};
use crate::service::AppError;
use chrono::{DateTime, Utc};
use db::models::attendance_log::{Column as LogColumn, Entity as LogEntity};
use db::models::attendance_session::{ActiveModel, Column, Entity, Geofence};
use db::models::class_enrollment::Model as Enrollment;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use util::config::AppConfig;
use validator::Validate;

pub use db::models::attendance_session::Model as AttendanceSession;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAttendanceSession {
    #[validate(length(min = 1, max = 128, message = "Title is required"))]
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub radius_meters: Option<f64>,
    #[validate(range(min = 0, max = 1440, message = "Late threshold must be between 0 and 1440 minutes"))]
    pub late_threshold_minutes: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAttendanceSession {
    #[validate(length(min = 1, max = 128, message = "Title is required"))]
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub radius_meters: Option<f64>,
    /// Drops the geofence; wins over the location fields.
    #[serde(default)]
    pub clear_geofence: bool,
    #[validate(range(min = 0, max = 1440, message = "Late threshold must be between 0 and 1440 minutes"))]
    pub late_threshold_minutes: Option<i32>,
}

/// A session with its live attendance counts.
#[derive(Debug, Clone, Serialize)]
pub struct SessionWithCounts {
    #[serde(flatten)]
    pub session: AttendanceSession,
    pub checked_in_count: u64,
    pub enrolled_count: u64,
}

/// Token, expiry and the JSON to encode into the QR image.
#[derive(Debug, Clone, Serialize)]
pub struct QrIssue {
    pub session_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub payload: String,
}

pub struct AttendanceSessionService;

impl AttendanceSessionService {
    pub async fn create(
        db: &DatabaseConnection,
        class_id: i64,
        teacher_id: i64,
        params: CreateAttendanceSession,
    ) -> Result<AttendanceSession, AppError> {
        params.validate()?;
        check_window(params.start_time, params.end_time)?;
        let geofence = geofence_from(params.location_lat, params.location_lng, params.radius_meters)?;
        let threshold = params
            .late_threshold_minutes
            .unwrap_or_else(|| AppConfig::global().late_threshold_minutes);

        let session = AttendanceSession::create(
            db,
            class_id,
            teacher_id,
            params.title.trim(),
            params.start_time,
            params.end_time,
            geofence,
            threshold,
        )
        .await?;

        tracing::info!(session_id = session.id, class_id, "Attendance session created");
        Ok(session)
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<AttendanceSession, AppError> {
        Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attendance session {id} not found")))
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        params: UpdateAttendanceSession,
    ) -> Result<AttendanceSession, AppError> {
        params.validate()?;
        let session = Self::find_by_id(db, id).await?;

        let start = params.start_time.unwrap_or(session.start_time);
        let end = params.end_time.unwrap_or(session.end_time);
        check_window(start, end)?;

        let touches_fence = params.location_lat.is_some()
            || params.location_lng.is_some()
            || params.radius_meters.is_some();
        let fence = if params.clear_geofence {
            Some(None)
        } else if touches_fence {
            let current = session.geofence();
            Some(geofence_from(
                params.location_lat.or(current.map(|g| g.lat)),
                params.location_lng.or(current.map(|g| g.lng)),
                params.radius_meters.or(current.map(|g| g.radius_meters)),
            )?)
        } else {
            None
        };

        let mut active: ActiveModel = session.into();
        if let Some(title) = params.title {
            active.title = Set(title.trim().to_owned());
        }
        active.start_time = Set(start);
        active.end_time = Set(end);
        if let Some(fence) = fence {
            active.location_lat = Set(fence.map(|g| g.lat));
            active.location_lng = Set(fence.map(|g| g.lng));
            active.radius_meters = Set(fence.map(|g| g.radius_meters));
        }
        if let Some(threshold) = params.late_threshold_minutes {
            active.late_threshold_minutes = Set(threshold);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Deletes the session and, by cascade, its logs.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), AppError> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Attendance session {id} not found")));
        }
        tracing::info!(session_id = id, "Attendance session deleted");
        Ok(())
    }

    /// Sessions of a class, newest start first, with check-in and roster counts.
    pub async fn list_for_class(
        db: &DatabaseConnection,
        class_id: i64,
        active: Option<bool>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<SessionWithCounts>, u64), AppError> {
        let mut sel = Entity::find().filter(Column::ClassId.eq(class_id));
        if let Some(a) = active {
            sel = sel.filter(Column::IsActive.eq(a));
        }

        let paginator = sel
            .order_by_desc(Column::StartTime)
            .paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let sessions = paginator.fetch_page(page.saturating_sub(1)).await?;

        let enrolled_count = Enrollment::count_for_class(db, class_id).await?;
        let counts = Self::checked_in_counts(db, sessions.iter().map(|s| s.id).collect()).await?;

        let rows = sessions
            .into_iter()
            .map(|session| SessionWithCounts {
                checked_in_count: counts.get(&session.id).copied().unwrap_or(0),
                enrolled_count,
                session,
            })
            .collect();
        Ok((rows, total))
    }

    pub async fn with_counts(
        db: &DatabaseConnection,
        session: AttendanceSession,
    ) -> Result<SessionWithCounts, AppError> {
        let enrolled_count = Enrollment::count_for_class(db, session.class_id).await?;
        let checked_in_count = db::models::attendance_log::Model::count_for_session(db, session.id).await?;
        Ok(SessionWithCounts {
            session,
            checked_in_count,
            enrolled_count,
        })
    }

    async fn checked_in_counts(
        db: &DatabaseConnection,
        session_ids: Vec<i64>,
    ) -> Result<HashMap<i64, u64>, AppError> {
        if session_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i64, i64)> = LogEntity::find()
            .select_only()
            .column(LogColumn::SessionId)
            .column_as(Expr::col(LogColumn::Id).count(), "count")
            .filter(LogColumn::SessionId.is_in(session_ids))
            .group_by(LogColumn::SessionId)
            .into_tuple()
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|(id, n)| (id, n.max(0) as u64)).collect())
    }

    /// Mints a new token for the session and activates it.
    pub async fn issue_qr(
        db: &DatabaseConnection,
        id: i64,
        expiry_minutes: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<(AttendanceSession, QrIssue), AppError> {
        Self::find_by_id(db, id).await?;
        let issued = attendance::issue_token(now, clamp_expiry(expiry_minutes));
        let session = AttendanceSession::set_qr(db, id, &issued.token, now, issued.expires_at).await?;

        tracing::info!(session_id = id, expires_at = %issued.expires_at, "QR code issued");
        let qr = qr_issue(&session, &issued.token, issued.expires_at, now);
        Ok((session, qr))
    }

    /// Deactivates the session but keeps its token and expiry for a resume.
    pub async fn stop_qr(db: &DatabaseConnection, id: i64) -> Result<AttendanceSession, AppError> {
        Self::find_by_id(db, id).await?;
        let session = AttendanceSession::set_active(db, id, false).await?;
        tracing::info!(session_id = id, "QR code stopped");
        Ok(session)
    }

    /// Reactivates the session, reissuing the token when missing or expired.
    ///
    /// The returned `QrIssue` is `None` when the existing token was kept.
    pub async fn resume_qr(
        db: &DatabaseConnection,
        id: i64,
        expiry_minutes: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<(AttendanceSession, Option<QrIssue>), AppError> {
        let session = Self::find_by_id(db, id).await?;
        if session.qr_code.is_none() || session.qr_expired(now) {
            let (session, qr) = Self::issue_qr(db, id, expiry_minutes, now).await?;
            return Ok((session, Some(qr)));
        }

        let session = AttendanceSession::set_active(db, id, true).await?;
        tracing::info!(session_id = id, "QR code resumed");
        Ok((session, None))
    }

    /// Clears token and expiry together and deactivates the session.
    pub async fn delete_qr(db: &DatabaseConnection, id: i64) -> Result<AttendanceSession, AppError> {
        Self::find_by_id(db, id).await?;
        let session = AttendanceSession::clear_qr(db, id).await?;
        tracing::info!(session_id = id, "QR code deleted");
        Ok(session)
    }

    /// The current token and payload, if one has been issued.
    ///
    /// The payload timestamp is the time the token was minted, so later
    /// edits to the session do not change it.
    pub fn current_qr(session: &AttendanceSession) -> Option<QrIssue> {
        match (session.qr_code.as_deref(), session.qr_expires_at) {
            (Some(token), Some(expires_at)) => {
                let issued_at = session.qr_issued_at.unwrap_or(session.updated_at);
                Some(qr_issue(session, token, expires_at, issued_at))
            }
            _ => None,
        }
    }
}

fn qr_issue(
    session: &AttendanceSession,
    token: &str,
    expires_at: DateTime<Utc>,
    issued_at: DateTime<Utc>,
) -> QrIssue {
    QrIssue {
        session_id: session.id,
        token: token.to_owned(),
        expires_at,
        payload: QrPayload::new(session, token, issued_at).to_json(),
    }
}

/// Requested lifetime clamped to `[1, MAX_QR_EXPIRY_MINUTES]`, defaulting
/// to `QR_EXPIRY_MINUTES`.
pub fn clamp_expiry(requested: Option<i64>) -> i64 {
    let cfg = AppConfig::global();
    let max = cfg.max_qr_expiry_minutes.max(1);
    requested.unwrap_or(cfg.qr_expiry_minutes).clamp(1, max)
}

fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }
    Ok(())
}

/// All three set gives a fence, none gives no fence, anything else is an error.
fn geofence_from(
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<f64>,
) -> Result<Option<Geofence>, AppError> {
    match (lat, lng, radius) {
        (None, None, None) => Ok(None),
        (Some(lat), Some(lng), Some(radius_meters)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(AppError::Validation("location_lat must be between -90 and 90".into()));
            }
            if !(-180.0..=180.0).contains(&lng) {
                return Err(AppError::Validation("location_lng must be between -180 and 180".into()));
            }
            if !(radius_meters > 0.0 && radius_meters.is_finite()) {
                return Err(AppError::Validation("radius_meters must be greater than 0".into()));
            }
            Ok(Some(Geofence {
                lat,
                lng,
                radius_meters,
            }))
        }
        _ => Err(AppError::Validation(
            "location_lat, location_lng and radius_meters must be given together".into(),
        )),
    }
}
