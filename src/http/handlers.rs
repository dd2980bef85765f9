//! API handlers.
//!
//! Handlers validate input, call one gateway operation and wrap the result.
//! Extractor rejections are turned into 400 `{"error": message}`.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::blockchain::TransactionHash;
use crate::http::response::{data, BadRequest};
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
}

pub async fn index() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: "Minter Explorer Gate API",
        version: "1.0",
    })
}

#[derive(Debug, Deserialize)]
pub struct PushRequest {
    pub transaction: String,
}

#[derive(Debug, Serialize)]
struct PushedTransaction {
    hash: TransactionHash,
}

pub async fn push_transaction(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    // Content-Type is not required.
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return BadRequest(rejection.body_text()).into_response(),
    };
    let request: PushRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return BadRequest(format!("invalid request body: {}", e)).into_response(),
    };
    if request.transaction.trim().is_empty() {
        return BadRequest("transaction is required".to_string()).into_response();
    }

    match state.gateway.push_transaction(request.transaction.trim()).await {
        Ok(outcome) => data(PushedTransaction { hash: outcome.hash }).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Push failed");
            e.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommissionQuery {
    pub transaction: String,
}

#[derive(Debug, Serialize)]
struct Commission {
    commission: String,
}

pub async fn estimate_tx_commission(
    State(state): State<AppState>,
    query: Result<Query<CommissionQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return BadRequest(rejection.body_text()).into_response(),
    };
    if query.transaction.trim().is_empty() {
        return BadRequest("transaction is required".to_string()).into_response();
    }

    match state.gateway.estimate_fee(query.transaction.trim()).await {
        Ok(commission) => data(Commission { commission }).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinQuery {
    pub coin_to_sell: String,
    pub coin_to_buy: String,
    pub value: String,
}

impl CoinQuery {
    fn validate(&self) -> Result<(), BadRequest> {
        let missing = [
            ("coinToSell", &self.coin_to_sell),
            ("coinToBuy", &self.coin_to_buy),
            ("value", &self.value),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty());

        match missing {
            Some((name, _)) => Err(BadRequest(format!("{} is required", name))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CoinBuyEstimate {
    commission: String,
    will_pay: String,
}

#[derive(Debug, Serialize)]
struct CoinSellEstimate {
    commission: String,
    will_get: String,
}

pub async fn estimate_coin_buy(
    State(state): State<AppState>,
    query: Result<Query<CoinQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return BadRequest(rejection.body_text()).into_response(),
    };
    if let Err(bad) = query.validate() {
        return bad.into_response();
    }

    match state
        .gateway
        .estimate_coin_buy(&query.coin_to_sell, &query.coin_to_buy, &query.value)
        .await
    {
        Ok(estimate) => data(CoinBuyEstimate {
            commission: estimate.commission,
            will_pay: estimate.value,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn estimate_coin_sell(
    State(state): State<AppState>,
    query: Result<Query<CoinQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return BadRequest(rejection.body_text()).into_response(),
    };
    if let Err(bad) = query.validate() {
        return bad.into_response();
    }

    match state
        .gateway
        .estimate_coin_sell(&query.coin_to_sell, &query.coin_to_buy, &query.value)
        .await
    {
        Ok(estimate) => data(CoinSellEstimate {
            commission: estimate.commission,
            will_get: estimate.value,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Serialize)]
struct Nonce {
    nonce: String,
}

pub async fn get_nonce(State(state): State<AppState>, Path(address): Path<String>) -> Response {
    match state.gateway.get_nonce(&address).await {
        Ok(nonce) => data(Nonce { nonce }).into_response(),
        Err(e) => e.into_response(),
    }
}
