//! Wallet session state and its read-only view.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::WalletError;
use crate::provider::SigningHandle;

/// Lifecycle stage of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Disconnected => "disconnected",
            SessionStatus::Connecting => "connecting",
            SessionStatus::Connected => "connected",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address and signer of a connected session. Always held together.
#[derive(Debug, Clone)]
struct Credentials {
    address: String,
    signing_handle: SigningHandle,
}

/// Immutable snapshot of the session.
///
/// Credentials exist exactly when the status is `Connected`; the
/// constructors are the only way to build a value.
#[derive(Debug, Clone)]
pub struct WalletSession {
    status: SessionStatus,
    credentials: Option<Credentials>,
    last_error: Option<WalletError>,
}

impl WalletSession {
    pub fn disconnected(last_error: Option<WalletError>) -> Self {
        Self {
            status: SessionStatus::Disconnected,
            credentials: None,
            last_error,
        }
    }

    pub(crate) fn connecting() -> Self {
        Self {
            status: SessionStatus::Connecting,
            credentials: None,
            last_error: None,
        }
    }

    pub(crate) fn connected(address: String, signing_handle: SigningHandle) -> Self {
        Self {
            status: SessionStatus::Connected,
            credentials: Some(Credentials {
                address,
                signing_handle,
            }),
            last_error: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == SessionStatus::Connected
    }

    pub fn address(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.address.as_str())
    }

    pub fn signing_handle(&self) -> Option<&SigningHandle> {
        self.credentials.as_ref().map(|c| &c.signing_handle)
    }

    /// Address and signer together, if connected.
    pub fn credentials(&self) -> Option<(&str, &SigningHandle)> {
        self.credentials
            .as_ref()
            .map(|c| (c.address.as_str(), &c.signing_handle))
    }

    pub fn last_error(&self) -> Option<&WalletError> {
        self.last_error.as_ref()
    }
}

impl Default for WalletSession {
    fn default() -> Self {
        Self::disconnected(None)
    }
}

/// Read-only handle to the live session. Cheap to clone.
#[derive(Clone)]
pub struct SessionView {
    cell: Arc<ArcSwap<WalletSession>>,
}

impl SessionView {
    pub(crate) fn new(cell: Arc<ArcSwap<WalletSession>>) -> Self {
        Self { cell }
    }

    /// Current session. Later transitions do not affect the returned value.
    pub fn snapshot(&self) -> Arc<WalletSession> {
        self.cell.load_full()
    }

    pub fn status(&self) -> SessionStatus {
        self.cell.load().status()
    }
}

impl fmt::Debug for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionView")
            .field("status", &self.status())
            .finish()
    }
}

/// Emitted on every session transition.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub previous: SessionStatus,
    pub current: SessionStatus,
    /// Address after the transition, if connected.
    pub address: Option<String>,
    pub error: Option<WalletError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{OfflineSigner, ProviderError, SignedTx};
    use crate::tx::types::SignDoc;
    use async_trait::async_trait;

    struct NullSigner;

    #[async_trait]
    impl OfflineSigner for NullSigner {
        async fn sign(&self, _signer: &str, _doc: &SignDoc) -> Result<SignedTx, ProviderError> {
            Ok(SignedTx { tx_bytes: vec![] })
        }
    }

    #[test]
    fn test_credentials_only_when_connected() {
        let session = WalletSession::default();
        assert_eq!(session.status(), SessionStatus::Disconnected);
        assert!(session.address().is_none());
        assert!(session.signing_handle().is_none());

        assert!(WalletSession::connecting().credentials().is_none());

        let session = WalletSession::connected(
            "kale1abc".to_string(),
            SigningHandle::new(Arc::new(NullSigner)),
        );
        assert!(session.is_connected());
        let (address, _) = session.credentials().unwrap();
        assert_eq!(address, "kale1abc");
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_snapshot_is_stable() {
        let cell = Arc::new(ArcSwap::from_pointee(WalletSession::default()));
        let view = SessionView::new(cell.clone());
        let before = view.snapshot();

        cell.store(Arc::new(WalletSession::connecting()));

        assert_eq!(before.status(), SessionStatus::Disconnected);
        assert_eq!(view.status(), SessionStatus::Connecting);
    }
}
