//! Chain-level value types shared by messages, fees and queries.

use serde::{Deserialize, Serialize};

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// A token amount in minimal units. Amounts travel as decimal strings on the
/// wire, like every Cosmos SDK coin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }

    /// Parsed amount, `None` if the node sent something non-numeric.
    pub fn amount_units(&self) -> Option<u128> {
        self.amount.parse().ok()
    }
}
