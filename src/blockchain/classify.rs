//! Node response classification.
//!
//! Turns a raw node envelope into either the success value or a typed
//! [`GatewayError`]. Classification never retries and never recovers: it is a
//! pure function of its input.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::blockchain::amount::from_smallest_unit;
use crate::blockchain::types::{NodeResponse, NodeResult};
use crate::error::{GatewayError, GatewayResult, UNKNOWN_ERROR_CODE};

/// Node code for a sender that cannot cover value plus commission.
pub const INSUFFICIENT_FUNDS_CODE: i64 = 107;

static WANTED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)wanted\s*(\d+)\s+(\w+)").expect("static regex"));

/// Classify a decoded node envelope.
pub fn classify<R: NodeResult>(response: NodeResponse<R>) -> GatewayResult<R> {
    if let Some(result) = response.result {
        return match result.status() {
            Some((code, log)) if code != 0 => Err(classify_code(code, log)),
            _ => Ok(result),
        };
    }

    if let Some(error) = response.error {
        let log = if error.data.is_empty() { error.message } else { error.data };
        return Err(GatewayError::NodeBusiness { code: error.code, log });
    }

    Err(GatewayError::UnknownNode { code: UNKNOWN_ERROR_CODE })
}

/// Classify a non-zero delivery code with its log.
pub fn classify_code(code: i64, log: &str) -> GatewayError {
    match code {
        INSUFFICIENT_FUNDS_CODE => insufficient_funds(code, log),
        _ => GatewayError::NodeBusiness { code, log: log.to_string() },
    }
}

fn insufficient_funds(code: i64, log: &str) -> GatewayError {
    let malformed = || GatewayError::MalformedLog { code, log: log.to_string() };

    let Some(captures) = WANTED_PATTERN.captures(log) else {
        return malformed();
    };
    let (Some(raw), Some(coin)) = (captures.get(1), captures.get(2)) else {
        return malformed();
    };

    let Some(amount) = from_smallest_unit(raw.as_str()) else {
        return malformed();
    };

    // Only the matched amount is rewritten; digits elsewhere (addresses) stay.
    let mut rendered = String::with_capacity(log.len());
    rendered.push_str(&log[..raw.start()]);
    rendered.push_str(&amount);
    rendered.push_str(&log[raw.end()..]);

    GatewayError::InsufficientFunds {
        log: rendered,
        code,
        amount,
        coin: coin.as_str().to_string(),
    }
}
