use crate::seed::{SeedFuture, Seeder};
use db::models::user::{Model, Role};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use sea_orm::DatabaseConnection;

pub struct UserSeeder;

pub const STUDENT_COUNT: u32 = 40;

impl Seeder for UserSeeder {
    fn seed<'a>(&'a self, db: &'a DatabaseConnection) -> SeedFuture<'a> {
        Box::pin(async move {
            // Fixed accounts, all with password "password123"
            Model::create(db, "admin", "admin@example.com", "Site Admin", "password123", Role::Admin).await?;
            Model::create(db, "teacher", "teacher@example.com", "Dr Ada Lovelace", "password123", Role::Teacher)
                .await?;
            Model::create(db, "student", "student@example.com", "Sam Student", "password123", Role::Student)
                .await?;

            for i in 2..=3 {
                let first: String = FirstName().fake();
                let last: String = LastName().fake();
                Model::create(
                    db,
                    &format!("teacher{i}"),
                    &format!("teacher{i}@example.com"),
                    &format!("Dr {first} {last}"),
                    "password123",
                    Role::Teacher,
                )
                .await?;
            }

            for i in 1..=STUDENT_COUNT {
                let username = format!("u{:08}", 25_000_000 + i);
                let first: String = FirstName().fake();
                let last: String = LastName().fake();
                // Some students never set a name.
                let full_name = if fastrand::u8(..10) == 0 {
                    String::new()
                } else {
                    format!("{first} {last}")
                };
                Model::create(
                    db,
                    &username,
                    &format!("{username}@tuks.co.za"),
                    &full_name,
                    "password123",
                    Role::Student,
                )
                .await?;
            }
            Ok(())
        })
    }
}
