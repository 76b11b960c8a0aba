//! Shared state handed to every axum handler through `State<AppState>`.

use crate::ws::WebSocketManager;
use sea_orm::DatabaseConnection;

/// Database handle plus the topic broadcaster used for live attendance feeds.
///
/// Both members are cheap to clone (connection pool and `Arc`-backed map).
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    ws: WebSocketManager,
}

impl AppState {
    pub fn new(db: DatabaseConnection, ws: WebSocketManager) -> Self {
        Self { db, ws }
    }

    /// Borrow the connection for the duration of a request.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn ws(&self) -> &WebSocketManager {
        &self.ws
    }

    /// Owned connection for spawned tasks.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    pub fn ws_clone(&self) -> WebSocketManager {
        self.ws.clone()
    }
}
