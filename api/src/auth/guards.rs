use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use db::models::{
    attendance_session::Entity as SessionEntity, class::Entity as ClassEntity,
    class_enrollment::Model as Enrollment, user::Entity as UserEntity, user::Role,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::collections::HashMap;
use util::state::AppState;

type GuardError = (StatusCode, Json<ApiResponse<Empty>>);

fn deny(status: StatusCode, message: impl Into<String>) -> GuardError {
    (status, Json(ApiResponse::error(message)))
}

fn db_error(e: sea_orm::DbErr, what: &str) -> GuardError {
    tracing::error!(error = %e, "Database error while checking {what}");
    deny(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Database error while checking {what}"),
    )
}

/// Verifies the caller's token and stores `AuthUser` in the request extensions.
async fn extract_and_insert_authuser(req: Request<Body>) -> Result<(Request<Body>, AuthUser), GuardError> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| deny(StatusCode::UNAUTHORIZED, "Authentication required"))?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

fn id_param(params: &HashMap<String, String>, key: &str) -> Result<i64, GuardError> {
    params
        .get(key)
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| deny(StatusCode::BAD_REQUEST, format!("Missing or invalid {key}")))
}

/// Whether `user_id` teaches `class_id`.
async fn owns_class(db: &DatabaseConnection, user_id: i64, class_id: i64) -> Result<bool, GuardError> {
    let class = ClassEntity::find_by_id(class_id)
        .one(db)
        .await
        .map_err(|e| db_error(e, "class"))?
        .ok_or_else(|| deny(StatusCode::NOT_FOUND, format!("Class {class_id} not found")))?;
    Ok(class.is_owned_by(user_id))
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(req: Request<Body>, next: Next) -> Result<Response, GuardError> {
    let (req, _user) = extract_and_insert_authuser(req).await?;
    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(req: Request<Body>, next: Next) -> Result<Response, GuardError> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !user.0.is_admin() {
        return Err(deny(StatusCode::FORBIDDEN, "Admin access required"));
    }
    Ok(next.run(req).await)
}

/// Teachers and admins.
pub async fn allow_teacher(req: Request<Body>, next: Next) -> Result<Response, GuardError> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !matches!(user.0.role, Role::Teacher | Role::Admin) {
        return Err(deny(StatusCode::FORBIDDEN, "Teacher access required"));
    }
    Ok(next.run(req).await)
}

/// The teacher of `{class_id}`, or an admin.
pub async fn allow_class_owner(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let (req, user) = extract_and_insert_authuser(req).await?;
    let class_id = id_param(&params, "class_id")?;

    if user.0.is_admin() || owns_class(app_state.db(), user.0.sub, class_id).await? {
        return Ok(next.run(req).await);
    }
    Err(deny(
        StatusCode::FORBIDDEN,
        "Only the teacher of this class may do this",
    ))
}

/// The teacher of `{class_id}`, an enrolled student, or an admin.
pub async fn allow_class_member(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let db = app_state.db();
    let (req, user) = extract_and_insert_authuser(req).await?;
    let class_id = id_param(&params, "class_id")?;

    if user.0.is_admin() || owns_class(db, user.0.sub, class_id).await? {
        return Ok(next.run(req).await);
    }

    let enrolled = Enrollment::is_enrolled(db, class_id, user.0.sub)
        .await
        .map_err(|e| db_error(e, "enrollment"))?;
    if enrolled {
        return Ok(next.run(req).await);
    }

    Err(deny(StatusCode::FORBIDDEN, "Not a member of this class"))
}

/// Live feed of a session: its class teacher or an admin.
pub async fn allow_attendance_ws_access(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let db = app_state.db();
    let (req, user) = extract_and_insert_authuser(req).await?;
    let session_id = id_param(&params, "session_id")?;

    let session = SessionEntity::find_by_id(session_id)
        .one(db)
        .await
        .map_err(|e| db_error(e, "session"))?
        .ok_or_else(|| deny(StatusCode::NOT_FOUND, "Attendance session not found"))?;

    if user.0.is_admin() || owns_class(db, user.0.sub, session.class_id).await? {
        return Ok(next.run(req).await);
    }

    Err(deny(
        StatusCode::FORBIDDEN,
        "Not allowed to access this attendance session websocket",
    ))
}

async fn check_user_exists(user_id: i64, db: &DatabaseConnection) -> Result<(), GuardError> {
    UserEntity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| db_error(e, "user"))?
        .ok_or_else(|| deny(StatusCode::NOT_FOUND, format!("User {user_id} not found.")))?;
    Ok(())
}

async fn check_class_exists(class_id: i64, db: &DatabaseConnection) -> Result<(), GuardError> {
    ClassEntity::find_by_id(class_id)
        .one(db)
        .await
        .map_err(|e| db_error(e, "class"))?
        .ok_or_else(|| deny(StatusCode::NOT_FOUND, format!("Class {class_id} not found.")))?;
    Ok(())
}

async fn check_session_hierarchy(
    class_id: i64,
    session_id: i64,
    db: &DatabaseConnection,
) -> Result<(), GuardError> {
    let session = SessionEntity::find_by_id(session_id)
        .one(db)
        .await
        .map_err(|e| db_error(e, "session"))?;

    match session {
        Some(s) if s.class_id == class_id => Ok(()),
        _ => Err(deny(
            StatusCode::NOT_FOUND,
            format!("Attendance session {session_id} in Class {class_id} not found."),
        )),
    }
}

/// Rejects malformed or unknown path ids before any handler runs.
///
/// Recognized parameters are `class_id`, `session_id`, `user_id` and
/// `student_id`; a session must belong to the class in the same path.
pub async fn validate_known_ids(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let db = app_state.db();

    let mut class_id: Option<i64> = None;
    let mut session_id: Option<i64> = None;
    let mut user_ids: Vec<i64> = Vec::new();

    for (key, raw) in &params {
        match key.as_str() {
            "class_id" | "session_id" | "user_id" | "student_id" => {
                let id = raw.parse::<i64>().map_err(|_| {
                    deny(
                        StatusCode::BAD_REQUEST,
                        format!("Invalid {key}: '{raw}'. Must be an integer."),
                    )
                    .into_response()
                })?;
                match key.as_str() {
                    "class_id" => class_id = Some(id),
                    "session_id" => session_id = Some(id),
                    _ => user_ids.push(id),
                }
            }
            _ => {
                return Err(deny(
                    StatusCode::BAD_REQUEST,
                    format!("Unexpected parameter: '{key}'."),
                )
                .into_response());
            }
        }
    }

    for uid in user_ids {
        check_user_exists(uid, db).await.map_err(|e| e.into_response())?;
    }
    if let Some(cid) = class_id {
        check_class_exists(cid, db).await.map_err(|e| e.into_response())?;
    }
    if let (Some(cid), Some(sid)) = (class_id, session_id) {
        check_session_hierarchy(cid, sid, db)
            .await
            .map_err(|e| e.into_response())?;
    }

    Ok(next.run(req).await)
}
