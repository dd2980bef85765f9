//! Response envelopes and error rendering.
//!
//! Successful answers are wrapped as `{"data": ..}`. Gateway errors render
//! as `{"error": {"code", "log"}}` with a status chosen by error kind; a
//! confirmation timeout is reported as accepted-but-pending with its hash.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::blockchain::TransactionHash;
use crate::error::GatewayError;

#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Wrap a payload as `{"data": value}`.
pub fn data<T: Serialize>(value: T) -> Json<DataEnvelope<T>> {
    Json(DataEnvelope { data: value })
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: i64,
    pub log: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct PendingTransaction<'a> {
    hash: &'a TransactionHash,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct PendingEnvelope<'a> {
    data: PendingTransaction<'a>,
    error: ErrorBody,
}

/// HTTP status for a gateway error.
pub fn status_for(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
        GatewayError::NodeBusiness { .. }
        | GatewayError::InsufficientFunds { .. }
        | GatewayError::UnknownNode { .. } => StatusCode::BAD_REQUEST,
        GatewayError::MalformedLog { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        GatewayError::Timeout { .. } => StatusCode::ACCEPTED,
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let mut body = ErrorBody {
            code: self.code(),
            log: self.log(),
            value: None,
            coin: None,
        };

        match &self {
            GatewayError::Timeout { hash } => {
                let envelope = PendingEnvelope {
                    data: PendingTransaction { hash, status: "pending" },
                    error: body,
                };
                (status, Json(envelope)).into_response()
            }
            GatewayError::InsufficientFunds { amount, coin, .. } => {
                body.value = Some(amount.clone());
                body.coin = Some(coin.clone());
                (status, Json(ErrorEnvelope { error: body })).into_response()
            }
            _ => (status, Json(ErrorEnvelope { error: body })).into_response(),
        }
    }
}

/// Rejection of a malformed client request: 400 `{"error": message}`.
#[derive(Debug)]
pub struct BadRequest(pub String);

#[derive(Debug, Serialize)]
struct BadRequestBody<'a> {
    error: &'a str,
}

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(BadRequestBody { error: &self.0 })).into_response()
    }
}
