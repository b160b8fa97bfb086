//! Kale wallet core.
//!
//! Wallet session and transaction submission layer for the Kale CosmWasm
//! chain: connects to an external signing provider, keeps the session
//! consistent across account switches, and turns swap/follow actions into
//! signed, broadcast transactions.
//!
//! # Architecture Overview
//!
//! ```text
//!   UI / CLI
//!     │ connect / disconnect            │ ContractAction
//!     ▼                                 ▼
//! ┌──────────────────┐          ┌──────────────────────┐
//! │ session::manager │          │ actions::adapter     │ (pure)
//! │  state machine   │          └──────────┬───────────┘
//! └──┬─────────┬─────┘                     │ ExecuteMsg
//!    │         │ SessionView               ▼
//!    │         └──────────────▶ ┌──────────────────────┐
//!    ▼                          │ tx::broadcaster      │
//! ┌──────────────────┐          └──┬────────────┬──────┘
//! │ provider::gateway│◀── sign ────┘            │ account / broadcast / tx
//! └──────────────────┘                          ▼
//!                               ┌──────────────────────┐
//!   node::query (reads) ──────▶ │ node::client (RPC +  │
//!                               │ REST, bounded)       │
//!                               └──────────────────────┘
//! ```

// Core subsystems
pub mod actions;
pub mod chain;
pub mod config;
pub mod error;
pub mod node;
pub mod provider;
pub mod session;
pub mod tx;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::WalletConfig;
pub use error::{WalletError, WalletResult};
pub use lifecycle::{Shutdown, WalletCore};
