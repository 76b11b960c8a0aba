use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use db::models::user::Role;
use serde::Deserialize;
use services::user::{UserFilter, UserService};
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::{Paginated, PaginationQuery, UserResponse};

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub q: Option<String>,
    pub role: Option<Role>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /users
///
/// ### Query Parameters
/// - `q`: substring of username, email or full name
/// - `role`: `admin`, `teacher` or `student`
/// - `page`, `per_page`
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> (StatusCode, Json<ApiResponse<Paginated<UserResponse>>>) {
    let (page, per_page) = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .resolve();
    let filter = UserFilter {
        q: query.q,
        role: query.role,
        page,
        per_page,
    };

    match UserService::list(app_state.db(), filter).await {
        Ok((users, total)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Paginated {
                    items: users.into_iter().map(UserResponse::from).collect(),
                    page,
                    per_page,
                    total,
                },
                "Users retrieved successfully",
            )),
        ),
        Err(e) => from_app_error(e),
    }
}

/// GET /users/{user_id}
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    match UserService::find_by_id(app_state.db(), user_id).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user.into(), "User retrieved successfully")),
        ),
        Err(e) => from_app_error(e),
    }
}
