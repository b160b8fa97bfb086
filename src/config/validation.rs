//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, decimals bounded)
//! - Check endpoints parse as URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WalletConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::WalletConfig;
use crate::node::client::normalize_endpoint;

/// Largest decimal count whose scale factor fits comfortably in u128 math.
pub const MAX_DECIMALS: u8 = 18;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let chain = &config.chain;

    if chain.chain_id.trim().is_empty() {
        errors.push(ValidationError::new("chain.chain_id", "must not be empty"));
    }
    if chain.bech32_prefix.trim().is_empty() {
        errors.push(ValidationError::new("chain.bech32_prefix", "must not be empty"));
    }
    if chain.fee_denom.trim().is_empty() {
        errors.push(ValidationError::new("chain.fee_denom", "must not be empty"));
    }
    if chain.decimals > MAX_DECIMALS {
        errors.push(ValidationError::new(
            "chain.decimals",
            format!("must be at most {}", MAX_DECIMALS),
        ));
    }
    if let Err(e) = normalize_endpoint(&chain.rpc_endpoint) {
        errors.push(ValidationError::new("chain.rpc_endpoint", e.to_string()));
    }
    if let Err(e) = normalize_endpoint(&chain.rest_endpoint) {
        errors.push(ValidationError::new("chain.rest_endpoint", e.to_string()));
    }

    let step = &chain.gas_price_step;
    if !(step.low >= 0.0 && step.low <= step.average && step.average <= step.high) {
        errors.push(ValidationError::new(
            "chain.gas_price_step",
            "must satisfy 0 <= low <= average <= high",
        ));
    }

    if config.contracts.amm.trim().is_empty() {
        errors.push(ValidationError::new("contracts.amm", "must not be empty"));
    }
    if config.contracts.social.trim().is_empty() {
        errors.push(ValidationError::new("contracts.social", "must not be empty"));
    }

    if config.session.authorize_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "session.authorize_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.session.event_capacity == 0 {
        errors.push(ValidationError::new(
            "session.event_capacity",
            "must be greater than 0",
        ));
    }

    if config.node.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("node.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.node.await_inclusion {
        if config.node.inclusion_timeout_secs == 0 {
            errors.push(ValidationError::new(
                "node.inclusion_timeout_secs",
                "must be greater than 0 when await_inclusion is set",
            ));
        }
        if config.node.inclusion_poll_ms == 0 {
            errors.push(ValidationError::new(
                "node.inclusion_poll_ms",
                "must be greater than 0 when await_inclusion is set",
            ));
        }
    }

    if !config.fees.auto && config.fees.gas_limit == 0 {
        errors.push(ValidationError::new("fees.gas_limit", "must be greater than 0"));
    }

    if let Some(url) = &config.provider.bridge_url {
        if let Err(e) = normalize_endpoint(url) {
            errors.push(ValidationError::new("provider.bridge_url", e.to_string()));
        }
        if config.provider.keystore_poll_ms == 0 {
            errors.push(ValidationError::new(
                "provider.keystore_poll_ms",
                "must be greater than 0",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
