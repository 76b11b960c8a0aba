#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, seed, send, token_for};
    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn teacher_creates_and_owns_class() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let token = token_for(&ctx.other_teacher);

        let (status, json) = send(
            &app,
            request(
                "POST",
                "/api/classes",
                Some(&token),
                Some(json!({ "code": "COS332", "name": "Networks", "teacher_id": ctx.teacher.id })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["teacher_id"], ctx.other_teacher.id);

        let (status, json) = send(&app, request("GET", "/api/classes", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["items"][0]["code"], "COS332");
    }

    #[tokio::test]
    async fn students_cannot_create_classes() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;

        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/classes",
                Some(&token_for(&ctx.alice)),
                Some(json!({ "code": "X1", "name": "X" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn class_visibility_follows_membership() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let uri = format!("/api/classes/{}", ctx.class.id);

        let (status, json) = send(&app, request("GET", "/api/classes", Some(&token_for(&ctx.alice)), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);

        let (status, _) = send(&app, request("GET", &uri, Some(&token_for(&ctx.alice)), None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, request("GET", &uri, Some(&token_for(&ctx.outsider)), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            request("PUT", &uri, Some(&token_for(&ctx.alice)), Some(json!({ "name": "Hacked" }))),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, request("GET", "/api/classes/9999", Some(&token_for(&ctx.admin)), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn only_admins_reassign_classes() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let uri = format!("/api/classes/{}", ctx.class.id);
        let body = json!({ "teacher_id": ctx.other_teacher.id, "description": "Moved" });

        let (status, _) = send(&app, request("PUT", &uri, Some(&token_for(&ctx.teacher)), Some(body.clone()))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(&app, request("PUT", &uri, Some(&token_for(&ctx.admin)), Some(body))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["teacher_id"], ctx.other_teacher.id);
        assert_eq!(json["data"]["description"], "Moved");
    }

    #[tokio::test]
    async fn roster_enroll_list_and_unenroll() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let token = token_for(&ctx.teacher);
        let uri = format!("/api/classes/{}/students", ctx.class.id);

        let (status, json) = send(
            &app,
            request(
                "POST",
                &uri,
                Some(&token),
                Some(json!({ "student_ids": [ctx.alice.id, ctx.outsider.id] })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["enrolled"], json!([ctx.outsider.id]));
        assert_eq!(json["data"]["skipped"], json!([ctx.alice.id]));

        let (status, _) = send(
            &app,
            request("POST", &uri, Some(&token), Some(json!({ "student_ids": [ctx.teacher.id] }))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["display_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alice", "bob", "Olly"]);

        let (status, _) = send(
            &app,
            request("DELETE", &format!("{uri}/{}", ctx.bob.id), Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            request("DELETE", &format!("{uri}/{}", ctx.bob.id), Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_teachers_cannot_manage_roster() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;

        let (status, _) = send(
            &app,
            request(
                "GET",
                &format!("/api/classes/{}/students", ctx.class.id),
                Some(&token_for(&ctx.other_teacher)),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn deleting_class_removes_it() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let uri = format!("/api/classes/{}", ctx.class.id);
        let token = token_for(&ctx.teacher);

        let (status, _) = send(&app, request("DELETE", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
