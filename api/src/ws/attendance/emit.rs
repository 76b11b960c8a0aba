use serde::Serialize;
use util::ws::{WebSocketManager, attendance_session_topic};

use super::payload;
use crate::ws::core::{envelope, event::Event};

#[derive(Debug, Serialize)]
pub struct CheckedInEvent {
    #[serde(flatten)]
    pub payload: payload::CheckedIn,
}
impl Event for CheckedInEvent {
    const NAME: &'static str = "attendance.checked_in";
    fn topic_path(&self) -> String {
        attendance_session_topic(self.payload.session_id)
    }
}

#[derive(Debug, Serialize)]
pub struct QrUpdatedEvent {
    #[serde(flatten)]
    pub payload: payload::QrUpdated,
}
impl Event for QrUpdatedEvent {
    const NAME: &'static str = "attendance.qr_updated";
    fn topic_path(&self) -> String {
        attendance_session_topic(self.payload.session_id)
    }
}

#[derive(Debug, Serialize)]
pub struct SessionDeletedEvent {
    #[serde(flatten)]
    pub payload: payload::SessionDeleted,
}
impl Event for SessionDeletedEvent {
    const NAME: &'static str = "attendance.session_deleted";
    fn topic_path(&self) -> String {
        attendance_session_topic(self.payload.session_id)
    }
}

/* ---------- one-liner helpers ---------- */

pub async fn checked_in(ws: &WebSocketManager, p: payload::CheckedIn) {
    envelope::emit(ws, &CheckedInEvent { payload: p }).await;
}

pub async fn qr_updated(ws: &WebSocketManager, p: payload::QrUpdated) {
    envelope::emit(ws, &QrUpdatedEvent { payload: p }).await;
}

pub async fn session_deleted(ws: &WebSocketManager, p: payload::SessionDeleted) {
    envelope::emit(ws, &SessionDeletedEvent { payload: p }).await;
}
