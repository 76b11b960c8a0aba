#[cfg(test)]
mod tests {
    use crate::helpers::app::{TestApp, TestCtx, make_test_app, request, seed, send, token_for};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use db::models::attendance_session::{Geofence, Model as SessionModel};
    use serde_json::{Value, json};

    const LAT: f64 = -25.7545;
    const LNG: f64 = 28.2314;

    fn fence() -> Geofence {
        Geofence {
            lat: LAT,
            lng: LNG,
            radius_meters: 50.0,
        }
    }

    /// Issues a QR as the class teacher and returns the response data.
    async fn issue(app: &TestApp, ctx: &TestCtx) -> Value {
        let (status, json) = send(
            app,
            request("POST", &ctx.session_uri("/qr"), Some(&token_for(&ctx.teacher)), Some(json!({}))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"].clone()
    }

    async fn check_in(app: &TestApp, user: &db::models::user::Model, body: Value) -> (StatusCode, Value) {
        send(
            app,
            request("POST", "/api/attendance/check-in", Some(&token_for(user)), Some(body)),
        )
        .await
    }

    #[tokio::test]
    async fn on_time_scan_is_present() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), None).await;
        let qr = issue(&app, &ctx).await;

        let (status, json) = check_in(
            &app,
            &ctx.alice,
            json!({ "qr_code": qr["qr_code"], "device_id": "pixel-7" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Checked in as PRESENT");
        assert_eq!(json["data"]["record"]["status"], "PRESENT");
        assert_eq!(json["data"]["record"]["student_id"], ctx.alice.id);
        assert_eq!(json["data"]["record"]["device_id"], "pixel-7");
        assert_eq!(json["data"]["session_title"], "Lecture 1");
    }

    #[tokio::test]
    async fn scan_after_threshold_is_late() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(30), None).await;
        let qr = issue(&app, &ctx).await;

        let (status, json) = check_in(&app, &ctx.bob, json!({ "payload": qr["payload"] })).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["record"]["status"], "LATE");
    }

    #[tokio::test]
    async fn not_enrolled_is_forbidden() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), None).await;
        let qr = issue(&app, &ctx).await;

        let (status, json) = check_in(&app, &ctx.outsider, json!({ "qr_code": qr["qr_code"] })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["code"], "NOT_ENROLLED");
    }

    #[tokio::test]
    async fn second_scan_returns_existing_record() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), None).await;
        let qr = issue(&app, &ctx).await;

        let (_, first) = check_in(&app, &ctx.alice, json!({ "qr_code": qr["qr_code"] })).await;
        let (status, json) = check_in(&app, &ctx.alice, json!({ "qr_code": qr["qr_code"] })).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["data"]["code"], "ALREADY_CHECKED_IN");
        assert_eq!(json["data"]["record"]["id"], first["data"]["record"]["id"]);

        let (_, records) = send(
            &app,
            request("GET", &ctx.session_uri("/records"), Some(&token_for(&ctx.teacher)), None),
        )
        .await;
        assert_eq!(records["data"]["total"], 1);
    }

    #[tokio::test]
    async fn scan_before_window_is_not_active() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() + Duration::hours(1), None).await;
        let qr = issue(&app, &ctx).await;

        let (status, json) = check_in(&app, &ctx.alice, json!({ "qr_code": qr["qr_code"] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["code"], "SESSION_NOT_ACTIVE");
    }

    #[tokio::test]
    async fn geofence_rejects_distant_scans() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), Some(fence())).await;
        let qr = issue(&app, &ctx).await;

        let (status, json) = check_in(
            &app,
            &ctx.alice,
            json!({ "qr_code": qr["qr_code"], "latitude": LAT + 0.00072, "longitude": LNG }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["code"], "OUT_OF_RANGE");
        assert_eq!(json["data"]["distance_meters"], 80.0);
        assert_eq!(json["data"]["radius_meters"], 50.0);

        let (status, json) = check_in(
            &app,
            &ctx.alice,
            json!({ "qr_code": qr["qr_code"], "latitude": LAT + 0.0002, "longitude": LNG }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["record"]["latitude"], LAT + 0.0002);

        // Without a fix the geofence is not applied.
        let (status, _) = check_in(&app, &ctx.bob, json!({ "qr_code": qr["qr_code"] })).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn stale_or_unknown_codes_are_rejected() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), None).await;

        let (status, json) = check_in(&app, &ctx.alice, json!({ "qr_code": "nope" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["code"], "INVALID_OR_EXPIRED_QR");

        let qr = issue(&app, &ctx).await;
        let token = qr["qr_code"].as_str().unwrap().to_owned();

        let (status, _) = send(
            &app,
            request("PUT", &ctx.session_uri("/qr/stop"), Some(&token_for(&ctx.teacher)), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, json) = check_in(&app, &ctx.alice, json!({ "qr_code": token })).await;
        assert_eq!(json["data"]["code"], "INVALID_OR_EXPIRED_QR");

        SessionModel::set_active(state.db(), ctx.session.id, true).await.unwrap();
        SessionModel::set_qr(
            state.db(),
            ctx.session.id,
            &token,
            Utc::now() - Duration::minutes(6),
            Utc::now() - Duration::minutes(1),
        )
        .await
        .unwrap();
        let (status, json) = check_in(&app, &ctx.alice, json!({ "qr_code": token })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["code"], "INVALID_OR_EXPIRED_QR");
    }

    #[tokio::test]
    async fn payload_for_another_session_is_rejected() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), None).await;
        let qr = issue(&app, &ctx).await;

        let mut payload: Value = serde_json::from_str(qr["payload"].as_str().unwrap()).unwrap();
        payload["sessionId"] = json!(ctx.session.id + 100);
        let (status, json) = check_in(&app, &ctx.alice, json!({ "payload": payload.to_string() })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["code"], "INVALID_OR_EXPIRED_QR");
    }

    #[tokio::test]
    async fn malformed_bodies_are_bad_requests() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;

        let (status, json) = check_in(&app, &ctx.alice, json!({ "device_id": "x" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "qr_code or payload is required");

        let (status, _) = check_in(&app, &ctx.alice, json!({ "qr_code": "abc", "latitude": 1.0 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            request("POST", "/api/attendance/check-in", None, Some(json!({ "qr_code": "abc" }))),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn teacher_marks_student_manually() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), Some(fence())).await;
        let token = token_for(&ctx.teacher);
        let uri = ctx.session_uri("/records");

        let (status, json) = send(
            &app,
            request("POST", &uri, Some(&token), Some(json!({ "student_id": ctx.bob.id }))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["record"]["device_id"], "manual");
        assert_eq!(json["data"]["record"]["status"], "PRESENT");

        let (status, json) = send(
            &app,
            request("POST", &uri, Some(&token), Some(json!({ "student_id": ctx.outsider.id }))),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["data"]["code"], "NOT_ENROLLED");

        let (status, _) = send(
            &app,
            request("POST", &uri, Some(&token_for(&ctx.alice)), Some(json!({ "student_id": ctx.alice.id }))),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
