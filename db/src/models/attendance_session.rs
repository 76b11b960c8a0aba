use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One lecture or lab meeting for which attendance is taken.
///
/// `qr_code`, `qr_expires_at` and `qr_issued_at` are always written
/// together: either all are set or all are null.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub qr_code: Option<String>,
    pub qr_expires_at: Option<DateTime<Utc>>,
    pub qr_issued_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub radius_meters: Option<f64>,
    pub late_threshold_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Circular geofence around the venue.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Geofence {
    pub lat: f64,
    pub lng: f64,
    pub radius_meters: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id",
        on_delete = "Cascade"
    )]
    Class,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,

    #[sea_orm(has_many = "super::attendance_log::Entity")]
    Logs,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::attendance_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &DbConn,
        class_id: i64,
        teacher_id: i64,
        title: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        geofence: Option<Geofence>,
        late_threshold_minutes: i32,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let session = ActiveModel {
            class_id: Set(class_id),
            teacher_id: Set(teacher_id),
            title: Set(title.to_owned()),
            start_time: Set(start_time),
            end_time: Set(end_time),
            qr_code: Set(None),
            qr_expires_at: Set(None),
            qr_issued_at: Set(None),
            is_active: Set(false),
            location_lat: Set(geofence.map(|g| g.lat)),
            location_lng: Set(geofence.map(|g| g.lng)),
            radius_meters: Set(geofence.map(|g| g.radius_meters)),
            late_threshold_minutes: Set(late_threshold_minutes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        session.insert(db).await
    }

    /// Stores a freshly minted token and activates the session.
    pub async fn set_qr(
        db: &DbConn,
        id: i64,
        token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(id),
            qr_code: Set(Some(token.to_owned())),
            qr_expires_at: Set(Some(expires_at)),
            qr_issued_at: Set(Some(issued_at)),
            is_active: Set(true),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(db)
        .await
    }

    /// Flips `is_active`, leaving the token and expiry untouched.
    pub async fn set_active(db: &DbConn, id: i64, active: bool) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(id),
            is_active: Set(active),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(db)
        .await
    }

    /// Removes token, expiry and issue time together and deactivates the session.
    pub async fn clear_qr(db: &DbConn, id: i64) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(id),
            qr_code: Set(None),
            qr_expires_at: Set(None),
            qr_issued_at: Set(None),
            is_active: Set(false),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(db)
        .await
    }

    pub async fn find_by_qr_code(db: &DbConn, token: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::QrCode.eq(token))
            .one(db)
            .await
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    }

    /// The geofence, present only when all three columns are set.
    pub fn geofence(&self) -> Option<Geofence> {
        match (self.location_lat, self.location_lng, self.radius_meters) {
            (Some(lat), Some(lng), Some(radius_meters)) => Some(Geofence {
                lat,
                lng,
                radius_meters,
            }),
            _ => None,
        }
    }

    pub fn qr_expired(&self, now: DateTime<Utc>) -> bool {
        match self.qr_expires_at {
            Some(expires_at) => now > expires_at,
            None => true,
        }
    }
}
