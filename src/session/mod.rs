//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! connect() / disconnect() / account change
//!     → manager.rs (state machine, single in-flight authorization)
//!         → provider::gateway (suggest, authorize, accounts, signer)
//!     → state.rs (WalletSession published through ArcSwap)
//!         → SessionView snapshots (tx::broadcaster, CLI, UI)
//!         → SessionEvent broadcast (UI side channel)
//!
//! provider account-change notifications
//!     → listener.rs → manager.handle_account_change()
//! ```
//!
//! # State Machine
//! ```text
//! Disconnected --connect--> Connecting --ok--> Connected
//!      ^                        |                  |
//!      +------- error ----------+                  |
//!      +------ disconnect / account change --------+
//! ```

pub mod listener;
pub mod manager;
pub mod state;

pub use listener::spawn_account_listener;
pub use manager::WalletSessionManager;
pub use state::{SessionEvent, SessionStatus, SessionView, WalletSession};
