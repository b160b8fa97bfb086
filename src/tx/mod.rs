//! Transaction submission subsystem.
//!
//! # Data Flow
//! ```text
//! TransactionRequest (messages + fee + memo)
//!     → broadcaster.rs
//!         1. SessionView must be Connected
//!         2. account number / sequence (node REST)
//!         3. SignDoc → SigningHandle → tx bytes
//!         4. broadcast_tx_sync (node RPC)
//!         5. optional inclusion polling (/tx)
//!     → TransactionResult | WalletError
//! ```
//!
//! # Design Decisions
//! - Failures are returned to the caller and never change session state
//! - Nothing is retried; a broadcast that times out may still land

pub mod broadcaster;
pub mod types;

pub use broadcaster::TransactionBroadcaster;
pub use types::{FeeSpec, SignDoc, StdFee, TransactionRequest, TransactionResult};
