#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, seed, send, token_for};
    use axum::http::StatusCode;
    use chrono::{DateTime, Duration, Utc};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn issue_returns_token_and_scannable_payload() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let before = Utc::now();

        let (status, json) = send(
            &app,
            request(
                "POST",
                &ctx.session_uri("/qr"),
                Some(&token_for(&ctx.teacher)),
                Some(json!({ "expiry_minutes": 10 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let data = &json["data"];
        assert_eq!(data["session_id"], ctx.session.id);
        assert_eq!(data["is_active"], true);

        let token = data["qr_code"].as_str().unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        let expires_at: DateTime<Utc> = data["expires_at"].as_str().unwrap().parse().unwrap();
        assert!(expires_at >= before + Duration::minutes(10));
        assert!(expires_at <= Utc::now() + Duration::minutes(10));

        let payload: Value = serde_json::from_str(data["payload"].as_str().unwrap()).unwrap();
        assert_eq!(payload["sessionId"], ctx.session.id);
        assert_eq!(payload["classId"], ctx.class.id);
        assert_eq!(payload["qrCode"], token);
        assert!(payload["timestamp"].is_i64());
    }

    #[tokio::test]
    async fn bodyless_issue_uses_default_lifetime() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let before = Utc::now();

        let (status, json) = send(
            &app,
            request("POST", &ctx.session_uri("/qr"), Some(&token_for(&ctx.teacher)), None),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let expires_at: DateTime<Utc> = json["data"]["expires_at"].as_str().unwrap().parse().unwrap();
        assert!(expires_at >= before + Duration::minutes(5));
        assert!(expires_at <= Utc::now() + Duration::minutes(5));
    }

    #[tokio::test]
    async fn reissue_replaces_previous_token() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let token = token_for(&ctx.teacher);

        let (_, first) = send(&app, request("POST", &ctx.session_uri("/qr"), Some(&token), Some(json!({})))).await;
        let (_, second) = send(&app, request("POST", &ctx.session_uri("/qr"), Some(&token), Some(json!({})))).await;
        assert_ne!(first["data"]["qr_code"], second["data"]["qr_code"]);

        let (status, current) = send(&app, request("GET", &ctx.session_uri("/qr"), Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(current["data"]["qr_code"], second["data"]["qr_code"]);
    }

    #[tokio::test]
    async fn stop_keeps_token_and_resume_reuses_it() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let token = token_for(&ctx.teacher);

        let (_, issued) = send(&app, request("POST", &ctx.session_uri("/qr"), Some(&token), Some(json!({})))).await;

        let (status, json) = send(&app, request("PUT", &ctx.session_uri("/qr/stop"), Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["is_active"], false);
        assert!(json["data"]["qr_expires_at"].is_string());

        let (status, json) = send(
            &app,
            request("PUT", &ctx.session_uri("/qr/resume"), Some(&token), Some(json!({}))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "QR code resumed");
        assert_eq!(json["data"]["is_active"], true);
        assert_eq!(json["data"]["qr_code"], issued["data"]["qr_code"]);
    }

    #[tokio::test]
    async fn resume_without_token_issues_one() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;

        let (status, json) = send(
            &app,
            request("PUT", &ctx.session_uri("/qr/resume"), Some(&token_for(&ctx.teacher)), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "QR code reissued");
        assert!(json["data"]["qr_code"].is_string());
    }

    #[tokio::test]
    async fn delete_clears_token() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let token = token_for(&ctx.teacher);

        send(&app, request("POST", &ctx.session_uri("/qr"), Some(&token), Some(json!({})))).await;
        let (status, json) = send(&app, request("DELETE", &ctx.session_uri("/qr"), Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["is_active"], false);
        assert!(json["data"]["qr_expires_at"].is_null());

        let (status, _) = send(&app, request("GET", &ctx.session_uri("/qr"), Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn qr_is_for_class_owner_only() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;

        for user in [&ctx.alice, &ctx.other_teacher] {
            let (status, _) = send(
                &app,
                request("POST", &ctx.session_uri("/qr"), Some(&token_for(user)), Some(json!({}))),
            )
            .await;
            assert_eq!(status, StatusCode::FORBIDDEN);
        }

        let (status, _) = send(
            &app,
            request("POST", &ctx.session_uri("/qr"), Some(&token_for(&ctx.admin)), Some(json!({}))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}
