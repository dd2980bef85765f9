//! Node response envelopes and gateway value types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Response envelope returned by every node endpoint.
///
/// A node either fills `result`, fills `error`, or (defectively) neither.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeResponse<R> {
    pub result: Option<R>,
    pub error: Option<NodeRpcError>,
}

impl<R> NodeResponse<R> {
    pub fn ok(result: R) -> Self {
        Self { result: Some(result), error: None }
    }
}

/// Node-level error object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeRpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: String,
}

/// Result of `send_transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendTransactionResult {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub hash: String,
}

/// Result of `estimate_tx_commission`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EstimateTxResult {
    pub commission: String,
}

/// Result of `estimate_coin_buy`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EstimateCoinBuyResult {
    pub will_pay: String,
    pub commission: String,
}

/// Result of `estimate_coin_sell`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EstimateCoinSellResult {
    pub will_get: String,
    pub commission: String,
}

/// Result of `address`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressResult {
    #[serde(default)]
    pub balance: HashMap<String, String>,
    pub transaction_count: String,
}

/// Status carried by a structured node result.
///
/// Only results that embed a delivery code (transaction submission) report
/// one; query results are successful whenever present.
pub trait NodeResult {
    fn status(&self) -> Option<(i64, &str)> {
        None
    }
}

impl NodeResult for SendTransactionResult {
    fn status(&self) -> Option<(i64, &str)> {
        Some((self.code, &self.log))
    }
}

impl NodeResult for EstimateTxResult {}
impl NodeResult for EstimateCoinBuyResult {}
impl NodeResult for EstimateCoinSellResult {}
impl NodeResult for AddressResult {}

/// Outcome of a coin swap estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinEstimate {
    /// Amount to pay (buy) or to receive (sell).
    pub value: String,
    /// Commission charged for the swap.
    pub commission: String,
}

impl From<EstimateCoinBuyResult> for CoinEstimate {
    fn from(r: EstimateCoinBuyResult) -> Self {
        Self { value: r.will_pay, commission: r.commission }
    }
}

impl From<EstimateCoinSellResult> for CoinEstimate {
    fn from(r: EstimateCoinSellResult) -> Self {
        Self { value: r.will_get, commission: r.commission }
    }
}

/// Transaction hash in explorer form: `Mt` followed by lower-case hex.
///
/// Used as the correlation topic for confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionHash(String);

impl TransactionHash {
    pub const PREFIX: &'static str = "Mt";

    /// Normalize a hash as reported by a node or an explorer feed.
    ///
    /// Accepts bare hex, `0x`-prefixed or already `Mt`-prefixed input in any case.
    pub fn from_node_hash(raw: &str) -> Self {
        let raw = raw.trim();
        let hex = strip_prefix_ignore_case(raw, Self::PREFIX)
            .or_else(|| strip_prefix_ignore_case(raw, "0x"))
            .unwrap_or(raw);
        Self(format!("{}{}", Self::PREFIX, hex.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// How a pushed transaction left the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushStatus {
    /// Accepted by a node; confirmation not awaited (single-node mode).
    Submitted,
    /// Confirmation observed on the notification bus.
    Confirmed,
}

/// Successful push result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushOutcome {
    pub hash: TransactionHash,
    pub status: PushStatus,
}
