//! Single-node RPC client.
//!
//! # Responsibilities
//! - Issue the five remote calls the gateway needs against one node
//! - Address the node per call, so concurrent requests never share a target
//! - Map connection and decoding failures, and bare 5xx answers, to
//!   `GatewayError::Transport`
//!
//! Node-level errors are returned inside the envelope untouched; turning them
//! into domain errors is the classifier's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::blockchain::types::{
    AddressResult, EstimateCoinBuyResult, EstimateCoinSellResult, EstimateTxResult,
    NodeResponse, SendTransactionResult,
};
use crate::error::{GatewayError, GatewayResult};

/// Remote operations exposed by a full node.
#[async_trait]
pub trait NodeApi: Send + Sync {
    async fn push_transaction(
        &self,
        node: &Url,
        tx: &str,
    ) -> GatewayResult<NodeResponse<SendTransactionResult>>;

    async fn estimate_tx(&self, node: &Url, tx: &str) -> GatewayResult<NodeResponse<EstimateTxResult>>;

    async fn estimate_coin_buy(
        &self,
        node: &Url,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value: &str,
    ) -> GatewayResult<NodeResponse<EstimateCoinBuyResult>>;

    async fn estimate_coin_sell(
        &self,
        node: &Url,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value: &str,
    ) -> GatewayResult<NodeResponse<EstimateCoinSellResult>>;

    async fn get_address(&self, node: &Url, address: &str) -> GatewayResult<NodeResponse<AddressResult>>;
}

/// HTTP client for the node REST API.
#[derive(Debug, Clone)]
pub struct HttpNodeClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpNodeClient {
    /// Create a client whose every call is bounded by `timeout`.
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, timeout })
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get<R: DeserializeOwned>(
        &self,
        node: &Url,
        path: &str,
        query: &[(&str, &str)],
    ) -> GatewayResult<NodeResponse<R>> {
        let url = node
            .join(path)
            .map_err(|e| GatewayError::Transport(format!("invalid node URL {}: {}", node, e)))?;

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("request to {} failed: {}", node, e)))?;

        // Nodes report rejections with non-2xx statuses and a JSON body, so the
        // body is decoded regardless of status.
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(format!("reading response from {} failed: {}", node, e)))?;

        decode_envelope(node, status, &body)
    }
}

/// Decode a node body.
///
/// A 5xx answer carrying neither a result nor an error object comes from
/// something in front of the node (proxy, load balancer), not the node
/// itself, and counts as a transport failure.
fn decode_envelope<R: DeserializeOwned>(
    node: &Url,
    status: StatusCode,
    body: &[u8],
) -> GatewayResult<NodeResponse<R>> {
    let envelope: NodeResponse<R> = serde_json::from_slice(body).map_err(|e| {
        GatewayError::Transport(format!(
            "undecodable response from {} (HTTP {}): {}",
            node, status, e
        ))
    })?;

    if status.is_server_error() && envelope.result.is_none() && envelope.error.is_none() {
        return Err(GatewayError::Transport(format!(
            "node {} unavailable (HTTP {})",
            node, status
        )));
    }
    Ok(envelope)
}

/// Raw transactions are sent `0x`-prefixed.
fn prefixed_tx(tx: &str) -> String {
    let tx = tx.trim();
    if tx.starts_with("0x") || tx.starts_with("0X") {
        tx.to_string()
    } else {
        format!("0x{}", tx)
    }
}

#[async_trait]
impl NodeApi for HttpNodeClient {
    async fn push_transaction(
        &self,
        node: &Url,
        tx: &str,
    ) -> GatewayResult<NodeResponse<SendTransactionResult>> {
        let tx = prefixed_tx(tx);
        self.get(node, "send_transaction", &[("tx", tx.as_str())]).await
    }

    async fn estimate_tx(&self, node: &Url, tx: &str) -> GatewayResult<NodeResponse<EstimateTxResult>> {
        let tx = prefixed_tx(tx);
        self.get(node, "estimate_tx_commission", &[("tx", tx.as_str())]).await
    }

    async fn estimate_coin_buy(
        &self,
        node: &Url,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value: &str,
    ) -> GatewayResult<NodeResponse<EstimateCoinBuyResult>> {
        self.get(
            node,
            "estimate_coin_buy",
            &[("coin_to_sell", coin_to_sell), ("coin_to_buy", coin_to_buy), ("value_to_buy", value)],
        )
        .await
    }

    async fn estimate_coin_sell(
        &self,
        node: &Url,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value: &str,
    ) -> GatewayResult<NodeResponse<EstimateCoinSellResult>> {
        self.get(
            node,
            "estimate_coin_sell",
            &[("coin_to_sell", coin_to_sell), ("coin_to_buy", coin_to_buy), ("value_to_sell", value)],
        )
        .await
    }

    async fn get_address(&self, node: &Url, address: &str) -> GatewayResult<NodeResponse<AddressResult>> {
        self.get(node, "address", &[("address", address)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_prefixing() {
        assert_eq!(prefixed_tx("f8a1"), "0xf8a1");
        assert_eq!(prefixed_tx("0xf8a1"), "0xf8a1");
        assert_eq!(prefixed_tx(" f8a1\n"), "0xf8a1");
    }

    #[test]
    fn test_server_error_without_envelope_is_transport() {
        let node: Url = "http://127.0.0.1:8841".parse().unwrap();
        let err = decode_envelope::<EstimateTxResult>(
            &node,
            StatusCode::BAD_GATEWAY,
            br#"{"message":"upstream unavailable"}"#,
        )
        .unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_server_error_with_node_error_is_kept() {
        let node: Url = "http://127.0.0.1:8841".parse().unwrap();
        let envelope = decode_envelope::<EstimateTxResult>(
            &node,
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"error":{"code":-32603,"message":"Internal error","data":"tx already exists in cache"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.error.unwrap().code, -32603);
    }

    #[test]
    fn test_empty_envelope_below_500_is_decoded() {
        let node: Url = "http://127.0.0.1:8841".parse().unwrap();
        let envelope = decode_envelope::<EstimateTxResult>(&node, StatusCode::OK, b"{}").unwrap();
        assert!(envelope.result.is_none());
        assert!(envelope.error.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let client = HttpNodeClient::new(Duration::from_millis(500)).unwrap();
        // Port 9 (discard) on loopback is closed in test environments.
        let node: Url = "http://127.0.0.1:9".parse().unwrap();
        let err = client.get_address(&node, "Mx00").await.unwrap_err();
        assert!(err.is_retryable());
    }
}
