//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check that the request timeout leaves room for the confirmation wait
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::GateConfig;

/// A single semantic violation, tied to the offending config key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::new("listener.bind_address", "must not be empty"));
    }

    if config.node.link.trim().is_empty() {
        errors.push(ValidationError::new("node.link", "must not be empty"));
    }
    if config.node.port == 0 {
        errors.push(ValidationError::new("node.port", "must be greater than 0"));
    }
    if config.node.request_timeout_secs == 0 {
        errors.push(ValidationError::new("node.request_timeout_secs", "must be greater than 0"));
    }
    if config.primary_url().is_err() {
        errors.push(ValidationError::new("node.link", "does not form a valid URL"));
    }

    for (i, node) in config.nodes.iter().enumerate() {
        if node.address.trim().is_empty() {
            errors.push(ValidationError::new(format!("nodes[{}].address", i), "must not be empty"));
        }
        if node.port == 0 {
            errors.push(ValidationError::new(format!("nodes[{}].port", i), "must be greater than 0"));
        }
    }

    if config.confirmation.timeout_secs == 0 {
        errors.push(ValidationError::new("confirmation.timeout_secs", "must be greater than 0"));
    }
    if config.confirmation.feed_reconnect_secs == 0 {
        errors.push(ValidationError::new("confirmation.feed_reconnect_secs", "must be greater than 0"));
    }
    if let Some(feed_url) = &config.confirmation.feed_url {
        match url::Url::parse(feed_url) {
            Ok(url) if url.scheme() == "ws" || url.scheme() == "wss" => {}
            Ok(_) => errors.push(ValidationError::new("confirmation.feed_url", "must use ws or wss")),
            Err(e) => errors.push(ValidationError::new("confirmation.feed_url", e.to_string())),
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    } else if config.timeouts.request_secs <= config.confirmation.timeout_secs {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must exceed confirmation.timeout_secs ({})",
                config.confirmation.timeout_secs
            ),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new("observability.metrics_address", "not a socket address"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
