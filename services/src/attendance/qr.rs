use chrono::{DateTime, Duration, Utc};
use db::models::attendance_session::Model as AttendanceSession;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Random bytes per token; rendered as twice as many hex characters.
pub const TOKEN_BYTES: usize = 32;

/// A freshly minted QR token, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Mints an unguessable token valid for `expiry_minutes` from `now`.
pub fn issue_token(now: DateTime<Utc>, expiry_minutes: i64) -> IssuedToken {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    IssuedToken {
        token: hex::encode(buf),
        expires_at: now + Duration::minutes(expiry_minutes),
    }
}

/// Whether `presented` is the session's live token at `now`.
///
/// Unknown token, inactive session and expiry are
/// indistinguishable to the caller.
pub fn is_valid(session: &AttendanceSession, presented: &str, now: DateTime<Utc>) -> bool {
    let Some(code) = session.qr_code.as_deref() else {
        return false;
    };
    let Some(expires_at) = session.qr_expires_at else {
        return false;
    };
    code == presented && session.is_active && now <= expires_at
}

/// JSON embedded in the rendered QR image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub session_id: i64,
    pub qr_code: String,
    pub class_id: i64,
    /// Issue time in milliseconds since the epoch.
    pub timestamp: i64,
}

impl QrPayload {
    pub fn new(session: &AttendanceSession, token: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session.id,
            qr_code: token.to_owned(),
            class_id: session.class_id,
            timestamp: issued_at.timestamp_millis(),
        }
    }

    pub fn to_json(&self) -> String {
        // Plain struct of integers and a string; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
