#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, seed, send, token_for};
    use axum::http::StatusCode;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn session_body() -> serde_json::Value {
        json!({
            "title": "Lecture 2",
            "start_time": "2025-03-01T08:00:00Z",
            "end_time": "2025-03-01T10:00:00Z",
            "location_lat": -25.7545,
            "location_lng": 28.2314,
            "radius_meters": 50.0,
            "late_threshold_minutes": 10
        })
    }

    #[tokio::test]
    async fn create_session_starts_inactive_without_qr() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;

        let (status, json) = send(
            &app,
            request(
                "POST",
                &format!("/api/classes/{}/sessions", ctx.class.id),
                Some(&token_for(&ctx.admin)),
                Some(session_body()),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let data = &json["data"];
        assert_eq!(data["title"], "Lecture 2");
        assert_eq!(data["teacher_id"], ctx.teacher.id);
        assert_eq!(data["is_active"], false);
        assert!(data["qr_expires_at"].is_null());
        assert_eq!(data["radius_meters"], 50.0);
        assert_eq!(data["late_threshold_minutes"], 10);
        assert!(data.get("qr_code").is_none());
    }

    #[tokio::test]
    async fn create_session_rejects_bad_window_and_partial_geofence() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let uri = format!("/api/classes/{}/sessions", ctx.class.id);
        let token = token_for(&ctx.teacher);

        let mut backwards = session_body();
        backwards["end_time"] = json!("2025-03-01T07:00:00Z");
        let (status, json) = send(&app, request("POST", &uri, Some(&token), Some(backwards))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);

        let mut partial = session_body();
        partial["radius_meters"] = serde_json::Value::Null;
        let (status, _) = send(&app, request("POST", &uri, Some(&token), Some(partial))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut far = session_body();
        far["location_lat"] = json!(91.0);
        let (status, _) = send(&app, request("POST", &uri, Some(&token), Some(far))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn students_read_but_cannot_create_sessions() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let uri = format!("/api/classes/{}/sessions", ctx.class.id);
        let token = token_for(&ctx.alice);

        let (status, _) = send(&app, request("POST", &uri, Some(&token), Some(session_body()))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["items"][0]["enrolled_count"], 2);
        assert_eq!(json["data"]["items"][0]["checked_in_count"], 0);

        let (status, _) = send(&app, request("GET", &uri, Some(&token_for(&ctx.outsider)), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn list_filters_active_sessions() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let token = token_for(&ctx.teacher);

        let (status, _) = send(&app, request("POST", &ctx.session_uri("/qr"), Some(&token), Some(json!({})))).await;
        assert_eq!(status, StatusCode::CREATED);
        send(
            &app,
            request(
                "POST",
                &format!("/api/classes/{}/sessions", ctx.class.id),
                Some(&token),
                Some(session_body()),
            ),
        )
        .await;

        let uri = format!("/api/classes/{}/sessions?active=true", ctx.class.id);
        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["items"][0]["id"], ctx.session.id);

        let uri = format!("/api/classes/{}/sessions?page=1&per_page=1", ctx.class.id);
        let (_, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(json["data"]["total"], 2);
        assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn session_must_belong_to_class() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let other = db::models::class::Model::create(state.db(), "COS333", "Other", None, ctx.teacher.id)
            .await
            .unwrap();

        let (status, _) = send(
            &app,
            request(
                "GET",
                &format!("/api/classes/{}/sessions/{}", other.id, ctx.session.id),
                Some(&token_for(&ctx.teacher)),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            request(
                "GET",
                &format!("/api/classes/{}/sessions/abc", ctx.class.id),
                Some(&token_for(&ctx.teacher)),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_session_window_and_geofence() {
        let (app, state) = make_test_app().await;
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let ctx = seed(state.db(), start, None).await;
        let token = token_for(&ctx.teacher);

        let (status, json) = send(
            &app,
            request(
                "PUT",
                &ctx.session_uri(""),
                Some(&token),
                Some(json!({
                    "title": "Lecture 1 (moved)",
                    "end_time": (start + Duration::hours(3)).to_rfc3339(),
                    "location_lat": 1.0,
                    "location_lng": 2.0,
                    "radius_meters": 30.0
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["title"], "Lecture 1 (moved)");
        assert_eq!(json["data"]["end_time"], (start + Duration::hours(3)).to_rfc3339());
        assert_eq!(json["data"]["radius_meters"], 30.0);

        let (status, json) = send(
            &app,
            request("PUT", &ctx.session_uri(""), Some(&token), Some(json!({ "clear_geofence": true }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"]["location_lat"].is_null());
        assert!(json["data"]["radius_meters"].is_null());

        let (status, _) = send(
            &app,
            request(
                "PUT",
                &ctx.session_uri(""),
                Some(&token),
                Some(json!({ "end_time": "2025-03-01T07:00:00Z" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_session() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let token = token_for(&ctx.teacher);

        let (status, _) = send(&app, request("DELETE", &ctx.session_uri(""), Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, request("GET", &ctx.session_uri(""), Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
