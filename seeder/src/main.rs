use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    attendance_log::AttendanceLogSeeder, attendance_session::AttendanceSessionSeeder,
    class::ClassSeeder, enrollment::EnrollmentSeeder, user::UserSeeder,
};
use colored::*;
use migration::{Migrator, MigratorTrait};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {e}", "Failed to connect to database:".red());
            std::process::exit(1);
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("{} {e}", "Failed to run migrations:".red());
        std::process::exit(1);
    }

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(ClassSeeder), "Class"),
        (Box::new(EnrollmentSeeder), "Enrollment"),
        (Box::new(AttendanceSessionSeeder), "AttendanceSession"),
        (Box::new(AttendanceLogSeeder), "AttendanceLog"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
