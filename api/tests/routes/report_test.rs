#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, seed, send, token_for};
    use api::app;
    use axum::{
        body::to_bytes,
        http::{StatusCode, header},
    };
    use chrono::{Duration, Utc};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn report_lists_absent_students() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), None).await;
        let token = token_for(&ctx.teacher);

        send(
            &app,
            request("POST", &ctx.session_uri("/records"), Some(&token), Some(json!({ "student_id": ctx.alice.id }))),
        )
        .await;

        let (status, json) = send(&app, request("GET", &ctx.session_uri("/report"), Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["session_id"], ctx.session.id);
        assert_eq!(data["summary"], json!({ "total": 2, "present": 1, "late": 0, "absent": 1 }));

        let rows = data["rows"].as_array().unwrap();
        assert_eq!(rows[0]["display_name"], "Alice");
        assert_eq!(rows[0]["status"], "PRESENT");
        assert_eq!(rows[0]["device_id"], "manual");
        assert_eq!(rows[1]["username"], "bob");
        assert_eq!(rows[1]["status"], "ABSENT");
        assert!(rows[1]["checked_at"].is_null());
    }

    #[tokio::test]
    async fn report_is_owner_only() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;

        let (status, _) = send(
            &app,
            request("GET", &ctx.session_uri("/report"), Some(&token_for(&ctx.alice)), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn export_is_csv_attachment() {
        let (_, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), None).await;
        let router = app(state.clone());

        let resp = router
            .oneshot(request(
                "GET",
                &ctx.session_uri("/report/export"),
                Some(&token_for(&ctx.teacher)),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"attendance_session_{}.csv\"", ctx.session.id).as_str()
        );

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "student_id,username,full_name,status,checked_at,latitude,longitude,device_id"
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], format!("{},alice,Alice,ABSENT,,,,", ctx.alice.id));
        assert_eq!(lines[2], format!("{},bob,bob,ABSENT,,,,", ctx.bob.id));
    }
}
