#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, seed, send, token_for};
    use crate::helpers::{connect_ws, spawn_server};
    use chrono::{Duration, Utc};
    use futures::{SinkExt, StreamExt};
    use serde_json::{Value, json};
    use tokio_tungstenite::tungstenite::protocol::Message;

    type Socket = tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

    /// Next JSON text frame, skipping control frames.
    async fn next_json(ws: &mut Socket) -> Value {
        let read = async {
            loop {
                match ws.next().await {
                    Some(Ok(Message::Text(txt))) => return serde_json::from_str::<Value>(&txt).unwrap(),
                    Some(Ok(_)) => continue,
                    other => panic!("socket ended: {other:?}"),
                }
            }
        };
        tokio::time::timeout(std::time::Duration::from_secs(5), read)
            .await
            .expect("timed out waiting for frame")
    }

    /// Round-trips an app ping so the server side is known to be subscribed.
    async fn wait_ready(ws: &mut Socket) {
        ws.send(Message::Text(json!({ "type": "ping" }).to_string().into()))
            .await
            .unwrap();
        assert_eq!(next_json(ws).await["type"], "pong");
    }

    #[tokio::test]
    async fn teacher_sees_check_ins_live() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now() - Duration::minutes(5), None).await;
        let addr = spawn_server(state.clone()).await;
        let teacher = token_for(&ctx.teacher);

        let path = format!("attendance/sessions/{}", ctx.session.id);
        let (mut ws, _) = connect_ws(addr, &path, &teacher).await.expect("connect");
        wait_ready(&mut ws).await;

        let (status, qr) = send(
            &app,
            request("POST", &ctx.session_uri("/qr"), Some(&teacher), Some(json!({}))),
        )
        .await;
        assert_eq!(status, axum::http::StatusCode::CREATED);

        let event = next_json(&mut ws).await;
        assert_eq!(event["event"], "attendance.qr_updated");
        assert_eq!(event["payload"]["is_active"], true);

        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/attendance/check-in",
                Some(&token_for(&ctx.alice)),
                Some(json!({ "qr_code": qr["data"]["qr_code"] })),
            ),
        )
        .await;
        assert_eq!(status, axum::http::StatusCode::CREATED);

        let event = next_json(&mut ws).await;
        assert_eq!(event["event"], "attendance.checked_in");
        assert_eq!(event["topic"], format!("attendance:session:{}", ctx.session.id));
        assert_eq!(event["payload"]["student_id"], ctx.alice.id);
        assert_eq!(event["payload"]["status"], "PRESENT");
        assert_eq!(event["payload"]["count"], 1);
        assert_eq!(event["payload"]["manual"], false);
    }

    #[tokio::test]
    async fn students_and_other_teachers_are_refused() {
        let (_, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let addr = spawn_server(state.clone()).await;
        let path = format!("attendance/sessions/{}", ctx.session.id);

        for user in [&ctx.alice, &ctx.other_teacher] {
            assert!(connect_ws(addr, &path, &token_for(user)).await.is_err());
        }
        assert!(connect_ws(addr, &path, "garbage").await.is_err());
        assert!(connect_ws(addr, "attendance/sessions/999", &token_for(&ctx.admin)).await.is_err());

        let (mut ws, _) = connect_ws(addr, &path, &token_for(&ctx.admin)).await.expect("admin connects");
        wait_ready(&mut ws).await;
    }

    #[tokio::test]
    async fn deleting_session_notifies_listeners() {
        let (app, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let addr = spawn_server(state.clone()).await;
        let teacher = token_for(&ctx.teacher);

        let path = format!("attendance/sessions/{}", ctx.session.id);
        let (mut ws, _) = connect_ws(addr, &path, &teacher).await.expect("connect");
        wait_ready(&mut ws).await;

        send(&app, request("DELETE", &ctx.session_uri(""), Some(&teacher), None)).await;

        let event = next_json(&mut ws).await;
        assert_eq!(event["event"], "attendance.session_deleted");
        assert_eq!(event["payload"]["session_id"], ctx.session.id);
    }

    #[tokio::test]
    async fn closing_last_socket_drops_topic() {
        let (_, state) = make_test_app().await;
        let ctx = seed(state.db(), Utc::now(), None).await;
        let addr = spawn_server(state.clone()).await;
        let topic = format!("attendance:session:{}", ctx.session.id);

        let path = format!("attendance/sessions/{}", ctx.session.id);
        let (mut ws, _) = connect_ws(addr, &path, &token_for(&ctx.teacher)).await.expect("connect");
        wait_ready(&mut ws).await;
        assert!(state.ws().has_topic(&topic).await);

        ws.close(None).await.unwrap();
        let gone = async {
            while state.ws().has_topic(&topic).await {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(std::time::Duration::from_secs(5), gone)
            .await
            .expect("topic still registered after close");
    }
}
