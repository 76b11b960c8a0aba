#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, seed, send, token_for};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use serde_json::json;

    #[tokio::test]
    async fn history_lists_own_check_ins_with_class() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), None).await;

        send(
            &app,
            request(
                "POST",
                &ctx.session_uri("/records"),
                Some(&token_for(&ctx.teacher)),
                Some(json!({ "student_id": ctx.alice.id })),
            ),
        )
        .await;

        let (status, json) = send(&app, request("GET", "/api/me/attendance", Some(&token_for(&ctx.alice)), None)).await;
        assert_eq!(status, StatusCode::OK);
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["session_id"], ctx.session.id);
        assert_eq!(rows[0]["status"], "PRESENT");
        assert_eq!(rows[0]["session_title"], "Lecture 1");
        assert_eq!(rows[0]["class_code"], "COS301");

        let (_, json) = send(&app, request("GET", "/api/me/attendance", Some(&token_for(&ctx.bob)), None)).await;
        assert_eq!(json["data"], json!([]));
    }

    #[tokio::test]
    async fn history_requires_login() {
        let (app, _) = make_test_app().await;
        let (status, _) = send(&app, request("GET", "/api/me/attendance", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
