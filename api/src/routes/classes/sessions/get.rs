use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use services::attendance_session::AttendanceSessionService;
use util::state::AppState;

use crate::response::{ApiResponse, from_app_error};
use crate::routes::common::{Paginated, PaginationQuery, SessionResponse};

#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    pub active: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /classes/{class_id}/sessions
///
/// Newest first, each with `checked_in_count` and `enrolled_count`.
/// `?active=true` limits the list to sessions currently accepting scans.
pub async fn list_sessions(
    State(app_state): State<AppState>,
    Path(class_id): Path<i64>,
    Query(query): Query<ListSessionsQuery>,
) -> (StatusCode, Json<ApiResponse<Paginated<SessionResponse>>>) {
    let (page, per_page) = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .resolve();

    match AttendanceSessionService::list_for_class(app_state.db(), class_id, query.active, page, per_page)
        .await
    {
        Ok((rows, total)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Paginated {
                    items: rows.into_iter().map(SessionResponse::from).collect(),
                    page,
                    per_page,
                    total,
                },
                "Attendance sessions retrieved",
            )),
        ),
        Err(e) => from_app_error(e),
    }
}

/// GET /classes/{class_id}/sessions/{session_id}
pub async fn get_session(
    State(app_state): State<AppState>,
    Path((_class_id, session_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    let db = app_state.db();
    let session = match AttendanceSessionService::find_by_id(db, session_id).await {
        Ok(s) => s,
        Err(e) => return from_app_error(e),
    };

    match AttendanceSessionService::with_counts(db, session).await {
        Ok(row) => (
            StatusCode::OK,
            Json(ApiResponse::success(row.into(), "Attendance session retrieved")),
        ),
        Err(e) => from_app_error(e),
    }
}
