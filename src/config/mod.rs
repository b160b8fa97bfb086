//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WalletConfig (validated, immutable)
//!     → cloned into each component at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the chain description never changes
//!   while a session is alive
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{
    ChainConfig, ContractsConfig, FeeConfig, GasPriceStep, NodeConfig, ObservabilityConfig,
    ProviderConfig, SessionConfig, WalletConfig,
};
