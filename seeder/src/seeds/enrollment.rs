use crate::seed::{SeedFuture, Seeder};
use db::models::{class, user};
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use services::enrollment::EnrollmentService;

pub struct EnrollmentSeeder;

impl Seeder for EnrollmentSeeder {
    fn seed<'a>(&'a self, db: &'a DatabaseConnection) -> SeedFuture<'a> {
        Box::pin(async move {
            let mut rng = StdRng::from_entropy();
            let students: Vec<i64> = user::Entity::find()
                .filter(user::Column::Role.eq(user::Role::Student))
                .all(db)
                .await?
                .into_iter()
                .map(|u| u.id)
                .collect();
            let fixed = user::Entity::find()
                .filter(user::Column::Username.eq("student"))
                .one(db)
                .await?;

            for c in class::Entity::find().all(db).await? {
                let mut roster = students.clone();
                roster.shuffle(&mut rng);
                roster.truncate(12 + fastrand::usize(..10));
                // The demo student is in every class.
                if let Some(s) = &fixed {
                    roster.push(s.id);
                }
                EnrollmentService::enroll(db, c.id, &roster).await?;
            }
            Ok(())
        })
    }
}
