//! Chain node subsystem.
//!
//! # Data Flow
//! ```text
//! ChainConfig + NodeConfig
//!     → client.rs (NodeClient: Tendermint RPC + Cosmos REST, bounded by timeout)
//!         → status / account / balance / smart query
//!         → broadcast_tx_sync / tx lookup
//!     → query.rs (QueryClient: read-only facade with availability flag)
//! ```
//!
//! # Design Decisions
//! - Every request is bounded by `node.rpc_timeout_secs`
//! - Unreachable node (transport error, timeout) maps to
//!   `WalletError::NetworkUnavailable`; an error the node answered with maps
//!   to `WalletError::Unknown` carrying its message
//! - Nothing in this module retries; callers decide

pub mod client;
pub mod query;
pub mod types;

pub use client::{normalize_endpoint, NodeClient};
pub use query::QueryClient;
pub use types::{BaseAccount, BroadcastResponse, NodeError, NodeResult, NodeStatus, TxResponse};
