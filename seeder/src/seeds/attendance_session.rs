use crate::seed::{SeedFuture, Seeder};
use chrono::{Duration, Utc};
use db::models::class;
use sea_orm::{DatabaseConnection, EntityTrait};
use services::attendance_session::{AttendanceSessionService, CreateAttendanceSession};

pub struct AttendanceSessionSeeder;

/// Centre of the seeded geofences.
pub const CAMPUS_LAT: f64 = -25.7545;
pub const CAMPUS_LNG: f64 = 28.2314;

const PAST_WEEKS: i64 = 3;

impl Seeder for AttendanceSessionSeeder {
    fn seed<'a>(&'a self, db: &'a DatabaseConnection) -> SeedFuture<'a> {
        Box::pin(async move {
            let now = Utc::now();

            for c in class::Entity::find().all(db).await? {
                for week in (1..=PAST_WEEKS).rev() {
                    let start = now - Duration::weeks(week);
                    AttendanceSessionService::create(
                        db,
                        c.id,
                        c.teacher_id,
                        CreateAttendanceSession {
                            title: format!("{} lecture {}", c.code, PAST_WEEKS - week + 1),
                            start_time: start,
                            end_time: start + Duration::minutes(90),
                            location_lat: Some(CAMPUS_LAT),
                            location_lng: Some(CAMPUS_LNG),
                            radius_meters: Some(100.0),
                            late_threshold_minutes: Some(15),
                        },
                    )
                    .await?;
                }

                // One running session per class, open for scanning.
                let live = AttendanceSessionService::create(
                    db,
                    c.id,
                    c.teacher_id,
                    CreateAttendanceSession {
                        title: format!("{} lecture {}", c.code, PAST_WEEKS + 1),
                        start_time: now - Duration::minutes(10),
                        end_time: now + Duration::minutes(80),
                        location_lat: None,
                        location_lng: None,
                        radius_meters: None,
                        late_threshold_minutes: None,
                    },
                )
                .await?;
                AttendanceSessionService::issue_qr(db, live.id, Some(60), now).await?;
            }
            Ok(())
        })
    }
}
