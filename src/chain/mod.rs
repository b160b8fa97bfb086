//! Target chain description.
//!
//! # Data Flow
//! ```text
//! WalletConfig.chain (ChainConfig, immutable)
//!     → descriptor.rs (chain suggestion handed to the signing provider)
//!     → amount.rs (display ↔ minimal unit conversion, fixed-point)
//!     → types.rs (Coin, shared by messages, fees and queries)
//! ```

pub mod amount;
pub mod descriptor;
pub mod types;

pub use amount::{format_units, AmountError, DisplayAmount};
pub use descriptor::ChainDescriptor;
pub use types::{ChainConfig, Coin};
