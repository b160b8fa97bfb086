//! Node response types and error definitions.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::error::WalletError;

/// Errors that can occur while talking to the chain node.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Endpoint string is not a usable URL.
    #[error("Invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request timed out.
    #[error("Node request timeout after {0} seconds")]
    Timeout(u64),

    /// Non-success HTTP status.
    #[error("Node returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON-RPC level error.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response body did not have the expected shape.
    #[error("Failed to decode node response: {0}")]
    Decode(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: String, actual: String },
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;

impl From<reqwest::Error> for NodeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            NodeError::Decode(e.to_string())
        } else {
            NodeError::Transport(e.to_string())
        }
    }
}

/// Only failures to reach the node are `NetworkUnavailable`. Anything the
/// node answered with keeps its message verbatim under `Unknown`.
impl From<NodeError> for WalletError {
    fn from(e: NodeError) -> Self {
        match e {
            NodeError::Transport(_) | NodeError::Timeout(_) => {
                WalletError::NetworkUnavailable(e.to_string())
            }
            NodeError::InvalidEndpoint(_)
            | NodeError::Status { .. }
            | NodeError::Rpc { .. }
            | NodeError::Decode(_)
            | NodeError::ChainMismatch { .. } => WalletError::Unknown(e.to_string()),
        }
    }
}

/// Accept heights and counters either as JSON numbers or decimal strings;
/// Tendermint and the Cosmos REST gateway both stringify 64-bit integers.
pub(crate) fn u64_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u64),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Summary of the node's `/status` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    /// Chain ID the node is serving.
    pub network: String,
    pub latest_block_height: u64,
    pub catching_up: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResult {
    pub node_info: NodeInfo,
    pub sync_info: SyncInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeInfo {
    pub network: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SyncInfo {
    #[serde(deserialize_with = "u64_from_any")]
    pub latest_block_height: u64,
    #[serde(default)]
    pub catching_up: bool,
}

impl From<StatusResult> for NodeStatus {
    fn from(r: StatusResult) -> Self {
        Self {
            network: r.node_info.network,
            latest_block_height: r.sync_info.latest_block_height,
            catching_up: r.sync_info.catching_up,
        }
    }
}

/// Result of `broadcast_tx_sync` (mempool admission / CheckTx).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BroadcastResponse {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub codespace: String,
    pub hash: String,
}

/// Execution outcome of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliverResult {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub log: String,
}

/// An included transaction as returned by `/tx`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxResponse {
    pub hash: String,
    #[serde(deserialize_with = "u64_from_any")]
    pub height: u64,
    pub tx_result: DeliverResult,
}

/// Signer bookkeeping needed to build a sign doc.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseAccount {
    pub address: String,
    #[serde(deserialize_with = "u64_from_any")]
    pub account_number: u64,
    #[serde(deserialize_with = "u64_from_any", default)]
    pub sequence: u64,
}
