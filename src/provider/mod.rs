//! Signing provider subsystem.
//!
//! # Data Flow
//! ```text
//! SigningProvider (wallet extension / local bridge / test double)
//!     → gateway.rs (bounded waits, error mapping, first-account policy)
//!     → session::manager (authorization, account-change reconciliation)
//!
//! OfflineSigner (wrapped in SigningHandle)
//!     → tx::broadcaster (sign SignDoc → tx bytes)
//! ```
//!
//! # Design Decisions
//! - The core never touches key material; signing is delegated through an
//!   opaque handle whose `Debug` output is redacted
//! - Provider calls may block on a human; the gateway bounds every one

pub mod bridge;
pub mod gateway;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::chain::descriptor::ChainDescriptor;
use crate::tx::types::SignDoc;

pub use bridge::BridgeProvider;
pub use gateway::SigningProviderGateway;

/// Errors reported by a signing provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No provider is installed or reachable.
    #[error("signing provider is not installed")]
    NotInstalled,

    /// The user declined the prompt.
    #[error("request rejected by user")]
    Rejected,

    #[error("provider failure: {0}")]
    Failed(String),
}

/// An account exposed by the provider for the enabled chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAccount {
    pub address: String,
}

/// Signed transaction, ready to broadcast.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedTx {
    pub tx_bytes: Vec<u8>,
}

impl fmt::Debug for SignedTx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedTx")
            .field("len", &self.tx_bytes.len())
            .finish()
    }
}

/// Produces signatures for one chain without exposing keys.
#[async_trait]
pub trait OfflineSigner: Send + Sync {
    /// Sign `doc` as `signer`.
    async fn sign(&self, signer: &str, doc: &SignDoc) -> Result<SignedTx, ProviderError>;
}

/// A key-holding wallet the core talks to.
#[async_trait]
pub trait SigningProvider: Send + Sync {
    /// Presence check. Must not prompt the user.
    fn is_available(&self) -> bool;

    /// Offer a chain the provider may not know yet.
    async fn suggest_chain(&self, chain: &ChainDescriptor) -> Result<(), ProviderError>;

    /// Ask the user to authorize the chain. May wait on a prompt.
    async fn enable(&self, chain_id: &str) -> Result<(), ProviderError>;

    /// Accounts for the chain, in provider order.
    async fn accounts(&self, chain_id: &str) -> Result<Vec<ProviderAccount>, ProviderError>;

    /// Signer for the chain.
    async fn offline_signer(&self, chain_id: &str) -> Result<Arc<dyn OfflineSigner>, ProviderError>;

    /// Notifications that the user switched accounts in the provider.
    fn subscribe_account_changes(&self) -> broadcast::Receiver<()>;
}

/// Opaque capability to sign as the session's account.
#[derive(Clone)]
pub struct SigningHandle(Arc<dyn OfflineSigner>);

impl SigningHandle {
    pub fn new(signer: Arc<dyn OfflineSigner>) -> Self {
        Self(signer)
    }

    pub async fn sign(&self, signer: &str, doc: &SignDoc) -> Result<SignedTx, ProviderError> {
        self.0.sign(signer, doc).await
    }
}

impl fmt::Debug for SigningHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningHandle([REDACTED])")
    }
}
