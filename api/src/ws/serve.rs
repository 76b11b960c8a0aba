//! Pumps one topic's broadcast channel into a WebSocket.

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use util::ws::WebSocketManager;

/// Interval between server pings.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Forwards every message published on `topic` to `socket` until either side
/// goes away, then drops the topic if this was its last subscriber.
///
/// Incoming text frames of `{"type":"ping"}` are answered with an
/// application-level pong; all other client input is ignored.
pub async fn serve_topic(socket: WebSocket, manager: WebSocketManager, topic: String) {
    let mut rx = manager.subscribe(&topic).await;
    let (mut sink, mut stream) = socket.split();

    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.tick().await;

    tracing::debug!(%topic, "WebSocket subscribed");

    loop {
        tokio::select! {
            published = rx.recv() => match published {
                Ok(text) => {
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%topic, skipped, "WebSocket subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if is_app_ping(text.as_str()) {
                        let pong = json!({ "type": "pong" }).to_string();
                        if sink.send(Message::Text(pong.into())).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Ping(data))) => {
                    if sink.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            _ = ping.tick() => {
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    drop(rx);
    manager.prune(&topic).await;
    tracing::debug!(%topic, "WebSocket closed");
}

fn is_app_ping(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .map(|v| v["type"] == "ping")
        .unwrap_or(false)
}
