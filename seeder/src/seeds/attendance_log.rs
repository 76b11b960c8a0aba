use crate::seed::{SeedFuture, Seeder};
use crate::seeds::attendance_session::{CAMPUS_LAT, CAMPUS_LNG};
use chrono::{Duration, Utc};
use db::models::attendance_log::{AttendanceStatus, Model as AttendanceLog, NewAttendanceLog};
use db::models::attendance_session::{Column, Entity};
use db::models::class_enrollment::Model as Enrollment;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

pub struct AttendanceLogSeeder;

impl Seeder for AttendanceLogSeeder {
    fn seed<'a>(&'a self, db: &'a DatabaseConnection) -> SeedFuture<'a> {
        Box::pin(async move {
            let past = Entity::find()
                .filter(Column::EndTime.lt(Utc::now()))
                .all(db)
                .await?;

            for session in past {
                for student_id in Enrollment::student_ids(db, session.class_id).await? {
                    // Roughly 70% on time, 15% late, the rest absent.
                    let roll = fastrand::u8(..100);
                    let (status, offset) = match roll {
                        0..70 => (AttendanceStatus::Present, fastrand::i64(0..=15)),
                        70..85 => (AttendanceStatus::Late, fastrand::i64(16..=60)),
                        _ => continue,
                    };
                    let jitter = || (fastrand::f64() - 0.5) * 0.0008;

                    AttendanceLog::create(
                        db,
                        NewAttendanceLog {
                            session_id: session.id,
                            student_id,
                            status,
                            checked_at: session.start_time + Duration::minutes(offset),
                            latitude: Some(CAMPUS_LAT + jitter()),
                            longitude: Some(CAMPUS_LNG + jitter()),
                            device_id: Some(format!("device-{student_id}")),
                        },
                    )
                    .await?;
                }
            }
            Ok(())
        })
    }
}
