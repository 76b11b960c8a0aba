use crate::service::AppError;
use chrono::Utc;
use db::models::user::{ActiveModel, Column, Entity, Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use validator::Validate;

pub use db::models::user::Model as User;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 64, message = "Username cannot be empty"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 128, message = "Full name is too long"))]
    pub full_name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,

    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 64, message = "Username cannot be empty"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 128, message = "Full name is too long"))]
    pub full_name: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: Option<String>,

    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Substring match on username, email or full name.
    pub q: Option<String>,
    pub role: Option<Role>,
    pub page: u64,
    pub per_page: u64,
}

pub struct UserService;

impl UserService {
    /// Self-service sign-up. The account is always a student.
    pub async fn register(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<User, AppError> {
        Self::create(
            db,
            CreateUser {
                username: username.trim().to_owned(),
                email: email.trim().to_owned(),
                full_name: full_name.trim().to_owned(),
                password: password.to_owned(),
                role: Role::Student,
            },
        )
        .await
    }

    pub async fn create(db: &DatabaseConnection, params: CreateUser) -> Result<User, AppError> {
        params.validate()?;

        if User::username_or_email_taken(db, &params.username, &params.email, None).await? {
            return Err(AppError::Conflict(
                "A user with this username or email already exists".into(),
            ));
        }

        let user = User::create(
            db,
            &params.username,
            &params.email,
            &params.full_name,
            &params.password,
            params.role,
        )
        .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Returns the user when `identifier` (username or email) and `password` match.
    pub async fn login(
        db: &DatabaseConnection,
        identifier: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = User::find_by_identifier(db, identifier.trim()).await? else {
            return Ok(None);
        };
        if user.verify_password(password) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<User, AppError> {
        Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
    }

    pub async fn update(db: &DatabaseConnection, id: i64, params: UpdateUser) -> Result<User, AppError> {
        params.validate()?;
        let user = Self::find_by_id(db, id).await?;

        let username = params.username.clone().unwrap_or_else(|| user.username.clone());
        let email = params.email.clone().unwrap_or_else(|| user.email.clone());
        if (params.username.is_some() || params.email.is_some())
            && User::username_or_email_taken(db, &username, &email, Some(id)).await?
        {
            return Err(AppError::Conflict(
                "A user with this username or email already exists".into(),
            ));
        }

        let mut active: ActiveModel = user.into();
        if let Some(username) = params.username {
            active.username = Set(username);
        }
        if let Some(email) = params.email {
            active.email = Set(email);
        }
        if let Some(full_name) = params.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(password) = params.password {
            active.password_hash = Set(User::hash_password(&password)?);
        }
        if let Some(role) = params.role {
            active.role = Set(role);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Deletes the account; enrollments, logs and owned classes cascade.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), AppError> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("User {id} not found")));
        }
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// One page of users ordered by username, plus the total match count.
    pub async fn list(db: &DatabaseConnection, filter: UserFilter) -> Result<(Vec<User>, u64), AppError> {
        let mut sel = Entity::find();
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            sel = sel.filter(
                Condition::any()
                    .add(Column::Username.contains(q))
                    .add(Column::Email.contains(q))
                    .add(Column::FullName.contains(q)),
            );
        }
        if let Some(role) = filter.role {
            sel = sel.filter(Column::Role.eq(role));
        }

        let paginator = sel
            .order_by_asc(Column::Username)
            .paginate(db, filter.per_page.max(1));
        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(filter.page.saturating_sub(1)).await?;
        Ok((users, total))
    }
}
