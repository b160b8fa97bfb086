//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the wallet
//! core. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the wallet core.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Static description of the target chain.
    pub chain: ChainConfig,

    /// Contract addresses and protocol constants.
    pub contracts: ContractsConfig,

    /// Session / signing provider settings.
    pub session: SessionConfig,

    /// Chain node request settings.
    pub node: NodeConfig,

    /// Default transaction fee.
    pub fees: FeeConfig,

    /// Signing provider bridge.
    pub provider: ProviderConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Gas price tiers offered to the signing provider.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GasPriceStep {
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

impl Default for GasPriceStep {
    fn default() -> Self {
        Self {
            low: 0.01,
            average: 0.025,
            high: 0.04,
        }
    }
}

/// Static description of the target chain. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain identifier (e.g., "kale-test-1").
    pub chain_id: String,

    /// Human-readable chain name shown by the provider.
    pub chain_name: String,

    /// Tendermint RPC endpoint. `tcp://` is dialled as `http://`.
    pub rpc_endpoint: String,

    /// Cosmos REST (LCD) endpoint.
    pub rest_endpoint: String,

    /// Bech32 account prefix (e.g., "kale").
    pub bech32_prefix: String,

    /// BIP-44 coin type.
    pub coin_type: u32,

    /// Minimal fee denomination (e.g., "ukale").
    pub fee_denom: String,

    /// Display denomination (e.g., "KALE").
    pub display_denom: String,

    /// Decimal places between display and minimal denomination.
    pub decimals: u8,

    /// Gas price tiers.
    pub gas_price_step: GasPriceStep,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: "kale-test-1".to_string(),
            chain_name: "Kale Testnet".to_string(),
            rpc_endpoint: "tcp://localhost:26657".to_string(),
            rest_endpoint: "http://localhost:1317".to_string(),
            bech32_prefix: "kale".to_string(),
            coin_type: 118,
            fee_denom: "ukale".to_string(),
            display_denom: "KALE".to_string(),
            decimals: 6,
            gas_price_step: GasPriceStep::default(),
        }
    }
}

/// Contract addresses the domain actions are sent to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Swap (AMM) contract address.
    pub amm: String,

    /// Social (follow/stake) contract address.
    pub social: String,

    /// Fixed protocol stake attached to every follow, in minimal fee units.
    pub follow_stake: u64,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            amm: "kale-amm".to_string(),
            social: "kale-social".to_string(),
            follow_stake: 100,
        }
    }
}

/// Session and signing provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on waiting for the user to answer the authorization prompt.
    pub authorize_timeout_secs: u64,

    /// Offer the chain descriptor to the provider before authorizing.
    pub suggest_chain: bool,

    /// Capacity of the session event channel.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            authorize_timeout_secs: 120,
            suggest_chain: true,
            event_capacity: 16,
        }
    }
}

/// Chain node request settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Per-request timeout in seconds (connect, query, broadcast).
    pub rpc_timeout_secs: u64,

    /// Wait for the transaction to be included in a block after broadcast.
    pub await_inclusion: bool,

    /// Maximum time to wait for inclusion in seconds.
    pub inclusion_timeout_secs: u64,

    /// Inclusion polling interval in milliseconds.
    pub inclusion_poll_ms: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_timeout_secs: 10,
            await_inclusion: true,
            inclusion_timeout_secs: 60,
            inclusion_poll_ms: 3000,
        }
    }
}

/// Default flat fee for domain actions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Fee amount in minimal fee units.
    pub amount: u64,

    /// Gas limit.
    pub gas_limit: u64,

    /// Let the provider estimate fees instead of using the flat fee.
    pub auto: bool,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            amount: 5000,
            gas_limit: 200_000,
            auto: false,
        }
    }
}

/// Signing provider bridge configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the local signing bridge. `None` means no provider.
    pub bridge_url: Option<String>,

    /// Keystore polling interval in milliseconds.
    pub keystore_poll_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            bridge_url: None,
            keystore_poll_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
