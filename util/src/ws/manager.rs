//! Topic-based fan-out for live attendance dashboards.
//!
//! Each topic owns a Tokio broadcast channel that is created on first
//! subscription and dropped again once nobody listens.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

type Topic = String;
type Sender = broadcast::Sender<String>;
type Receiver = broadcast::Receiver<String>;

/// Messages buffered per topic before slow receivers start lagging.
const TOPIC_CAPACITY: usize = 100;

#[derive(Clone, Default)]
pub struct WebSocketManager {
    inner: Arc<RwLock<HashMap<Topic, Sender>>>,
}

impl WebSocketManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `topic`, creating its channel if necessary.
    pub async fn subscribe(&self, topic: &str) -> Receiver {
        let mut map = self.inner.write().await;
        map.entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Sends `msg` to every subscriber of `topic`.
    ///
    /// Unknown topics are a no-op; a topic left without receivers is removed.
    pub async fn broadcast<T: Into<String>>(&self, topic: &str, msg: T) {
        let mut map = self.inner.write().await;
        if let Some(sender) = map.get(topic) {
            let _ = sender.send(msg.into());
            if sender.receiver_count() == 0 {
                tracing::debug!("Removing topic '{topic}' due to no subscribers.");
                map.remove(topic);
            }
        }
    }

    /// Removes `topic` if nobody is subscribed to it any more.
    pub async fn prune(&self, topic: &str) {
        let mut map = self.inner.write().await;
        if map.get(topic).is_some_and(|s| s.receiver_count() == 0) {
            tracing::debug!("Removing topic '{topic}' due to no subscribers.");
            map.remove(topic);
        }
    }

    /// Number of live receivers on `topic` (0 when the topic does not exist).
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.inner
            .read()
            .await
            .get(topic)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Whether a channel currently exists for `topic`.
    pub async fn has_topic(&self, topic: &str) -> bool {
        self.inner.read().await.contains_key(topic)
    }
}
