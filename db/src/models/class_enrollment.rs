use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QuerySelect};
use serde::Serialize;

/// Membership of a student in a class.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "class_enrollments")]
pub struct Model {
    /// Class ID (foreign key to `classes`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub class_id: i64,

    /// Student ID (foreign key to `users`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,

    pub enrolled_at: DateTime<Utc>,
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
        from = "Column::StudentId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn enroll(db: &DbConn, class_id: i64, student_id: i64) -> Result<Model, DbErr> {
        let enrollment = ActiveModel {
            class_id: Set(class_id),
            student_id: Set(student_id),
            enrolled_at: Set(Utc::now()),
        };

        enrollment.insert(db).await
    }

    /// Returns `true` when a row was removed.
    pub async fn unenroll(db: &DbConn, class_id: i64, student_id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id((class_id, student_id)).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn is_enrolled(db: &DbConn, class_id: i64, student_id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id((class_id, student_id))
            .one(db)
            .await?
            .is_some())
    }

    pub async fn student_ids(db: &DbConn, class_id: i64) -> Result<Vec<i64>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::ClassId.eq(class_id))
            .into_tuple::<i64>()
            .all(db)
            .await
    }

    pub async fn count_for_class(db: &DbConn, class_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .count(db)
            .await
    }
}
