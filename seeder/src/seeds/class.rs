use crate::seed::{SeedFuture, Seeder};
use db::models::class::Model as Class;
use db::models::user::{Column, Entity, Role};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

pub struct ClassSeeder;

const CLASSES: [(&str, &str, &str); 6] = [
    ("COS301", "Software Engineering", "Mon 08:30, IT 4-1"),
    ("COS332", "Computer Networks", "Tue 10:30, IT 2-27"),
    ("COS333", "Programming Languages", "Wed 12:30, EMB 2-150"),
    ("COS344", "Computer Graphics", "Thu 14:30, IT 4-4"),
    ("COS314", "Artificial Intelligence", "Fri 08:30, Thuto 1-1"),
    ("COS326", "Database Systems", "Fri 11:30, IT 4-5"),
];

impl Seeder for ClassSeeder {
    fn seed<'a>(&'a self, db: &'a DatabaseConnection) -> SeedFuture<'a> {
        Box::pin(async move {
            let teachers = Entity::find()
                .filter(Column::Role.eq(Role::Teacher))
                .order_by_asc(Column::Id)
                .all(db)
                .await?;
            if teachers.is_empty() {
                return Ok(());
            }

            for (i, (code, name, description)) in CLASSES.iter().enumerate() {
                let teacher = &teachers[i % teachers.len()];
                Class::create(db, code, name, Some(description), teacher.id).await?;
            }
            Ok(())
        })
    }
}
