//! Scripted node client for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::blockchain::client::NodeApi;
use crate::blockchain::types::{
    AddressResult, EstimateCoinBuyResult, EstimateCoinSellResult, EstimateTxResult,
    NodeResponse, SendTransactionResult,
};
use crate::error::{GatewayError, GatewayResult};

/// Replies keyed by node port; ports without a reply are unreachable.
#[derive(Debug, Default)]
pub struct MockNodeApi {
    replies: HashMap<u16, String>,
    calls: Mutex<Vec<(u16, &'static str)>>,
}

impl MockNodeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call on `port` with the given JSON envelope.
    pub fn reply(mut self, port: u16, body: &str) -> Self {
        self.replies.insert(port, body.to_string());
        self
    }

    /// `(port, method)` pairs in call order.
    pub fn calls(&self) -> Vec<(u16, &'static str)> {
        self.calls.lock().unwrap().clone()
    }

    fn respond<R: DeserializeOwned>(&self, node: &Url, method: &'static str) -> GatewayResult<NodeResponse<R>> {
        let port = node.port_or_known_default().unwrap_or_default();
        self.calls.lock().unwrap().push((port, method));
        match self.replies.get(&port) {
            Some(body) => serde_json::from_str(body).map_err(|e| GatewayError::Transport(e.to_string())),
            None => Err(GatewayError::Transport(format!("connection refused: {}", node))),
        }
    }
}

#[async_trait]
impl NodeApi for MockNodeApi {
    async fn push_transaction(&self, node: &Url, _tx: &str) -> GatewayResult<NodeResponse<SendTransactionResult>> {
        self.respond(node, "push_transaction")
    }

    async fn estimate_tx(&self, node: &Url, _tx: &str) -> GatewayResult<NodeResponse<EstimateTxResult>> {
        self.respond(node, "estimate_tx")
    }

    async fn estimate_coin_buy(
        &self,
        node: &Url,
        _coin_to_sell: &str,
        _coin_to_buy: &str,
        _value: &str,
    ) -> GatewayResult<NodeResponse<EstimateCoinBuyResult>> {
        self.respond(node, "estimate_coin_buy")
    }

    async fn estimate_coin_sell(
        &self,
        node: &Url,
        _coin_to_sell: &str,
        _coin_to_buy: &str,
        _value: &str,
    ) -> GatewayResult<NodeResponse<EstimateCoinSellResult>> {
        self.respond(node, "estimate_coin_sell")
    }

    async fn get_address(&self, node: &Url, _address: &str) -> GatewayResult<NodeResponse<AddressResult>> {
        self.respond(node, "get_address")
    }
}
