use crate::service::AppError;
use chrono::Utc;
use db::models::class::{ActiveModel, Column, Entity};
use db::models::class_enrollment::{Column as EnrollmentColumn, Entity as EnrollmentEntity};
use db::models::user::{Model as User, Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};
use serde::{Deserialize, Deserializer};
use validator::Validate;

pub use db::models::class::Model as Class;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClass {
    #[validate(length(min = 1, max = 32, message = "Class code is required"))]
    pub code: String,

    #[validate(length(min = 1, max = 128, message = "Class name is required"))]
    pub name: String,

    pub description: Option<String>,

    /// Only honoured for admins; teachers always own what they create.
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClass {
    #[validate(length(min = 1, max = 32, message = "Class code is required"))]
    pub code: Option<String>,

    #[validate(length(min = 1, max = 128, message = "Class name is required"))]
    pub name: Option<String>,

    /// `Some(None)` clears the description.
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,

    /// Reassign ownership (admin only, enforced by the caller).
    pub teacher_id: Option<i64>,
}

/// Maps a present field to `Some`, so an explicit `null` becomes `Some(None)`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

pub struct ClassService;

impl ClassService {
    pub async fn create(db: &DatabaseConnection, actor: &User, params: CreateClass) -> Result<Class, AppError> {
        params.validate()?;

        let teacher_id = match actor.role {
            Role::Teacher => actor.id,
            Role::Admin => {
                let id = params
                    .teacher_id
                    .ok_or_else(|| AppError::Validation("teacher_id is required".into()))?;
                Self::ensure_teacher(db, id).await?;
                id
            }
            Role::Student => {
                return Err(AppError::Forbidden("Students cannot create classes".into()));
            }
        };

        let class = Class::create(
            db,
            params.code.trim(),
            params.name.trim(),
            params.description.as_deref(),
            teacher_id,
        )
        .await?;

        tracing::info!(class_id = class.id, teacher_id, "Class created");
        Ok(class)
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Class, AppError> {
        Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class {id} not found")))
    }

    /// Classes visible to `viewer`: all for admins, owned for teachers,
    /// enrolled for students.
    pub async fn list_for(
        db: &DatabaseConnection,
        viewer: &User,
        q: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Class>, u64), AppError> {
        let mut sel = Entity::find();
        match viewer.role {
            Role::Admin => {}
            Role::Teacher => sel = sel.filter(Column::TeacherId.eq(viewer.id)),
            Role::Student => {
                let enrolled = EnrollmentEntity::find()
                    .select_only()
                    .column(EnrollmentColumn::ClassId)
                    .filter(EnrollmentColumn::StudentId.eq(viewer.id))
                    .into_query();
                sel = sel.filter(Column::Id.in_subquery(enrolled));
            }
        }
        if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
            sel = sel.filter(
                Condition::any()
                    .add(Column::Code.contains(q))
                    .add(Column::Name.contains(q)),
            );
        }

        let paginator = sel.order_by_asc(Column::Code).paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let classes = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((classes, total))
    }

    pub async fn update(db: &DatabaseConnection, id: i64, params: UpdateClass) -> Result<Class, AppError> {
        params.validate()?;
        let class = Self::find_by_id(db, id).await?;

        if let Some(teacher_id) = params.teacher_id {
            Self::ensure_teacher(db, teacher_id).await?;
        }

        let mut active: ActiveModel = class.into();
        if let Some(code) = params.code {
            active.code = Set(code.trim().to_owned());
        }
        if let Some(name) = params.name {
            active.name = Set(name.trim().to_owned());
        }
        if let Some(description) = params.description {
            active.description = Set(description);
        }
        if let Some(teacher_id) = params.teacher_id {
            active.teacher_id = Set(teacher_id);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Deletes the class with its enrollments, sessions and logs.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), AppError> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Class {id} not found")));
        }
        tracing::info!(class_id = id, "Class deleted");
        Ok(())
    }

    async fn ensure_teacher(db: &DatabaseConnection, user_id: i64) -> Result<(), AppError> {
        let user = db::models::user::Entity::find_by_id(user_id).one(db).await?;
        match user {
            Some(u) if u.role == Role::Teacher => Ok(()),
            Some(_) => Err(AppError::Validation(format!("User {user_id} is not a teacher"))),
            None => Err(AppError::NotFound(format!("User {user_id} not found"))),
        }
    }
}
