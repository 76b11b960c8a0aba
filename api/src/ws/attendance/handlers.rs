use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::IntoResponse,
};
use util::state::AppState;
use util::ws::attendance_session_topic;

use crate::ws::serve::serve_topic;

/// GET /ws/attendance/sessions/{session_id}?token=...
pub async fn attendance_session_ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
) -> impl IntoResponse {
    let manager = app_state.ws_clone();
    let topic = attendance_session_topic(session_id);
    ws.on_upgrade(move |socket| serve_topic(socket, manager, topic))
}
