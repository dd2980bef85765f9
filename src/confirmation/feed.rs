//! Explorer transaction feed.
//!
//! Connects to the explorer's websocket stream, extracts transaction hashes
//! from every text frame and publishes them on the notification bus.
//! Reconnects after a fixed delay until shutdown.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::blockchain::types::TransactionHash;
use crate::confirmation::bus::NotificationBus;
use crate::observability::metrics;

pub struct ConfirmationFeed {
    url: String,
    bus: Arc<NotificationBus>,
    reconnect_delay: Duration,
}

impl ConfirmationFeed {
    pub fn new(url: impl Into<String>, bus: Arc<NotificationBus>, reconnect_delay: Duration) -> Self {
        Self {
            url: url.into(),
            bus,
            reconnect_delay,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(url = %self.url, "Confirmation feed starting");
        loop {
            tokio::select! {
                result = self.consume() => match result {
                    Ok(()) => tracing::warn!(url = %self.url, "Confirmation feed closed by server"),
                    Err(e) => tracing::warn!(url = %self.url, error = %e, "Confirmation feed disconnected"),
                },
                _ = shutdown.recv() => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = shutdown.recv() => break,
            }
        }
        tracing::info!("Confirmation feed stopped");
    }

    async fn consume(&self) -> Result<(), tungstenite::Error> {
        let (mut stream, _) = tokio_tungstenite::connect_async(self.url.as_str()).await?;
        tracing::info!(url = %self.url, "Confirmation feed connected");

        while let Some(message) = stream.next().await {
            match message? {
                Message::Text(text) => {
                    for hash in extract_hashes(text.as_str()) {
                        let delivered = self.bus.publish(hash.as_str());
                        metrics::record_feed_published(delivered);
                        tracing::debug!(hash = %hash, delivered, "Published confirmation");
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        Ok(())
    }
}

/// Transaction hashes carried by one feed payload.
///
/// Accepts `{"hash": h}`, `{"data": {"hash": h}}` or `{"data": [{"hash": h}, ..]}`,
/// each optionally wrapped in `{"result": ..}`. Anything else yields nothing.
pub fn extract_hashes(payload: &str) -> Vec<TransactionHash> {
    let Ok(value) = serde_json::from_str::<Value>(payload) else {
        tracing::debug!("Ignoring non-JSON feed frame");
        return Vec::new();
    };

    let root = value.get("result").unwrap_or(&value);
    let mut hashes = Vec::new();
    collect_hash(root, &mut hashes);
    match root.get("data") {
        Some(Value::Array(items)) => items.iter().for_each(|item| collect_hash(item, &mut hashes)),
        Some(item) => collect_hash(item, &mut hashes),
        None => {}
    }
    hashes
}

fn collect_hash(value: &Value, out: &mut Vec<TransactionHash>) {
    if let Some(hash) = value.get("hash").and_then(Value::as_str) {
        if !hash.trim().is_empty() {
            out.push(TransactionHash::from_node_hash(hash));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(hashes: Vec<TransactionHash>) -> Vec<String> {
        hashes.into_iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_single_hash() {
        assert_eq!(strs(extract_hashes(r#"{"hash":"MtABC"}"#)), vec!["Mtabc"]);
    }

    #[test]
    fn test_data_array() {
        let payload = r#"{"result":{"data":[{"hash":"Mt01"},{"hash":"02"},{"nonce":3}]}}"#;
        assert_eq!(strs(extract_hashes(payload)), vec!["Mt01", "Mt02"]);
    }

    #[test]
    fn test_data_object() {
        assert_eq!(strs(extract_hashes(r#"{"data":{"hash":"0xFF"}}"#)), vec!["Mtff"]);
    }

    #[test]
    fn test_garbage_is_ignored() {
        assert!(extract_hashes("ping").is_empty());
        assert!(extract_hashes(r#"{"hash":""}"#).is_empty());
        assert!(extract_hashes(r#"[1,2,3]"#).is_empty());
    }

    #[tokio::test]
    async fn test_stops_on_shutdown_while_disconnected() {
        let bus = Arc::new(NotificationBus::new());
        // Nothing listens on this port, so the feed sits in its reconnect delay.
        let feed = ConfirmationFeed::new("ws://127.0.0.1:9/feed", bus, Duration::from_secs(60));
        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(feed.run(rx));
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("feed did not stop")
            .unwrap();
    }
}
