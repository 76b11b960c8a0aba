use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CheckedIn {
    pub session_id: i64,
    pub student_id: i64,
    pub status: String,
    pub checked_at: String, // RFC3339
    /// Logs recorded for the session so far.
    pub count: u64,
    pub manual: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QrUpdated {
    pub session_id: i64,
    pub is_active: bool,
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDeleted {
    pub session_id: i64,
}
