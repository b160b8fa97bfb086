//! Error types surfaced by the wallet core.
//!
//! Session-lifecycle errors are stored on `WalletSession::last_error` and
//! broadcast with session events. Transaction errors are returned to the
//! caller of `submit()` and are never retried.

use thiserror::Error;

/// Errors that can occur while managing the wallet session or submitting
/// transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No signing provider is installed or reachable.
    #[error("Signing provider not found. Please install the wallet extension.")]
    ExtensionNotFound,

    /// The user declined (or closed) the provider's authorization prompt.
    #[error("User rejected the connection request")]
    UserRejectedConnection,

    /// The provider did not answer the authorization prompt in time.
    #[error("Provider authorization timed out after {0} seconds")]
    AuthorizationTimeout(u64),

    /// Authorization succeeded but the provider listed no accounts.
    #[error("No accounts available in signing provider")]
    NoAccountsAvailable,

    /// A connect attempt was abandoned because `disconnect()` ran meanwhile.
    #[error("Connection attempt superseded by disconnect")]
    ConnectionSuperseded,

    /// The chain node could not be reached (transport failure or timeout).
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// An operation needed a connected session.
    #[error("Wallet session is not connected")]
    SessionNotConnected,

    /// A domain action failed validation. Always raised before any I/O.
    #[error("Invalid action input: {0}")]
    InvalidActionInput(String),

    /// The user declined to sign the transaction.
    #[error("User rejected the signing request")]
    UserRejectedSignature,

    /// The chain has no account record for the signer yet.
    #[error("Account {0} does not exist on chain")]
    AccountNotFound(String),

    /// The chain accepted the broadcast call but rejected the transaction.
    #[error("Transaction failed with code {code}: {raw_log}")]
    TransactionRejectedByChain { code: u32, raw_log: String },

    /// The transaction was broadcast but not observed in a block in time.
    /// It may still be included later; resubmitting risks a double spend.
    #[error("Transaction {tx_hash} was submitted but not found on chain after {secs} seconds")]
    ConfirmationTimeout { tx_hash: String, secs: u64 },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl WalletError {
    /// Short machine-readable label, used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            WalletError::ExtensionNotFound => "extension_not_found",
            WalletError::UserRejectedConnection => "user_rejected_connection",
            WalletError::AuthorizationTimeout(_) => "authorization_timeout",
            WalletError::NoAccountsAvailable => "no_accounts_available",
            WalletError::ConnectionSuperseded => "connection_superseded",
            WalletError::NetworkUnavailable(_) => "network_unavailable",
            WalletError::SessionNotConnected => "session_not_connected",
            WalletError::InvalidActionInput(_) => "invalid_action_input",
            WalletError::UserRejectedSignature => "user_rejected_signature",
            WalletError::AccountNotFound(_) => "account_not_found",
            WalletError::TransactionRejectedByChain { .. } => "rejected_by_chain",
            WalletError::ConfirmationTimeout { .. } => "confirmation_timeout",
            WalletError::Unknown(_) => "unknown",
        }
    }
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;
