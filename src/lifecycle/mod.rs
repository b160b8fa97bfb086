//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → NodeClient → QueryClient → Gateway
//!         → SessionManager → Broadcaster → background tasks
//!
//! Shutdown (shutdown.rs):
//!     Trigger → background tasks exit → session dropped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: node first, then session, then listeners
//! - Shutdown has timeout: stragglers are aborted after the grace period

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{StartupError, WalletCore};
