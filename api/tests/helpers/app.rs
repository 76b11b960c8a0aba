use api::{app, auth::generate_jwt};
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use db::models::{
    attendance_session::{Geofence, Model as SessionModel},
    class::Model as ClassModel,
    class_enrollment::Model as EnrollmentModel,
    user::{Model as UserModel, Role},
};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::convert::Infallible;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::{state::AppState, ws::WebSocketManager};

pub type TestApp = BoxCloneService<Request<Body>, Response, Infallible>;

/// The full router over a fresh in-memory database.
pub async fn make_test_app() -> (TestApp, AppState) {
    let db = setup_test_db().await;
    let app_state = AppState::new(db, WebSocketManager::new());
    let router = app(app_state.clone());
    (router.into_service().boxed_clone(), app_state)
}

pub fn token_for(user: &UserModel) -> String {
    generate_jwt(user.id, user.role).unwrap().0
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends `req` and parses the JSON body.
pub async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// A class with its teacher, two enrolled students, an outsider and one
/// two-hour session.
pub struct TestCtx {
    pub admin: UserModel,
    pub teacher: UserModel,
    pub other_teacher: UserModel,
    pub alice: UserModel,
    pub bob: UserModel,
    pub outsider: UserModel,
    pub class: ClassModel,
    pub session: SessionModel,
}

pub async fn user(db: &DatabaseConnection, name: &str, full_name: &str, role: Role) -> UserModel {
    UserModel::create(db, name, &format!("{name}@test.com"), full_name, "password123", role)
        .await
        .unwrap()
}

/// Seeds [`TestCtx`] with a session window starting at `start`.
pub async fn seed(db: &DatabaseConnection, start: DateTime<Utc>, fence: Option<Geofence>) -> TestCtx {
    let admin = user(db, "admin", "Admin", Role::Admin).await;
    let teacher = user(db, "teacher", "Dr Teach", Role::Teacher).await;
    let other_teacher = user(db, "teacher2", "Dr Other", Role::Teacher).await;
    let alice = user(db, "alice", "Alice", Role::Student).await;
    let bob = user(db, "bob", "", Role::Student).await;
    let outsider = user(db, "outsider", "Olly", Role::Student).await;

    let class = ClassModel::create(db, "COS301", "Software Engineering", None, teacher.id)
        .await
        .unwrap();
    EnrollmentModel::enroll(db, class.id, alice.id).await.unwrap();
    EnrollmentModel::enroll(db, class.id, bob.id).await.unwrap();

    let session = SessionModel::create(
        db,
        class.id,
        teacher.id,
        "Lecture 1",
        start,
        start + Duration::hours(2),
        fence,
        15,
    )
    .await
    .unwrap();

    TestCtx {
        admin,
        teacher,
        other_teacher,
        alice,
        bob,
        outsider,
        class,
        session,
    }
}

impl TestCtx {
    pub fn session_uri(&self, suffix: &str) -> String {
        format!(
            "/api/classes/{}/sessions/{}{}",
            self.class.id, self.session.id, suffix
        )
    }
}
