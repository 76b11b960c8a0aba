#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, send, token_for, user};
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serde_json::json;

    #[tokio::test]
    async fn admin_manages_users() {
        let (app, state) = make_test_app().await;
        let admin = user(state.db(), "root", "", Role::Admin).await;
        let token = token_for(&admin);

        let (status, json) = send(
            &app,
            request(
                "POST",
                "/api/users",
                Some(&token),
                Some(json!({
                    "username": "t1",
                    "email": "t1@test.com",
                    "full_name": "Dr T",
                    "password": "password123",
                    "role": "teacher"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let teacher_id = json["data"]["id"].as_i64().unwrap();
        assert_eq!(json["data"]["role"], "teacher");

        let (status, json) = send(&app, request("GET", "/api/users?role=teacher", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["items"][0]["username"], "t1");

        let (status, json) = send(
            &app,
            request(
                "PUT",
                &format!("/api/users/{teacher_id}"),
                Some(&token),
                Some(json!({ "full_name": "Prof T" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["full_name"], "Prof T");

        let (status, _) = send(&app, request("DELETE", &format!("/api/users/{teacher_id}"), Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, request("GET", &format!("/api/users/{teacher_id}"), Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_admins_are_forbidden() {
        let (app, state) = make_test_app().await;
        let teacher = user(state.db(), "t1", "", Role::Teacher).await;

        let (status, json) = send(&app, request("GET", "/api/users", Some(&token_for(&teacher)), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Admin access required");
    }

    #[tokio::test]
    async fn invalid_path_id_is_bad_request() {
        let (app, state) = make_test_app().await;
        let admin = user(state.db(), "root", "", Role::Admin).await;

        let (status, json) = send(&app, request("GET", "/api/users/abc", Some(&token_for(&admin)), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Invalid user_id: 'abc'. Must be an integer.");
    }
}
