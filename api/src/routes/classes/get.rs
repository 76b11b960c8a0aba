use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use services::class::ClassService;
use services::user::UserService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::{ClassResponse, Paginated, PaginationQuery};

#[derive(Debug, Deserialize)]
pub struct ListClassesQuery {
    pub q: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /classes
///
/// Classes visible to the caller: every class for admins, owned classes
/// for teachers, enrolled classes for students.
pub async fn list_classes(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(query): Query<ListClassesQuery>,
) -> (StatusCode, Json<ApiResponse<Paginated<ClassResponse>>>) {
    let db = app_state.db();
    let (page, per_page) = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .resolve();

    let viewer = match UserService::find_by_id(db, claims.sub).await {
        Ok(user) => user,
        Err(e) => return from_app_error(e),
    };

    match ClassService::list_for(db, &viewer, query.q.as_deref(), page, per_page).await {
        Ok((classes, total)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Paginated {
                    items: classes.into_iter().map(ClassResponse::from).collect(),
                    page,
                    per_page,
                    total,
                },
                "Classes retrieved successfully",
            )),
        ),
        Err(e) => from_app_error(e),
    }
}

/// GET /classes/{class_id}
pub async fn get_class(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<ClassResponse>>) {
    match ClassService::find_by_id(app_state.db(), class_id).await {
        Ok(class) => (
            StatusCode::OK,
            Json(ApiResponse::success(class.into(), "Class retrieved successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
