#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn health_is_public() {
        let (app, _) = make_test_app().await;
        let (status, json) = send(&app, request("GET", "/api/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], "OK");
    }
}
