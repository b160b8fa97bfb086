//! Gateway between the session manager and the signing provider.
//!
//! # Responsibilities
//! - Detect whether a provider is present
//! - Suggest the chain, authorize, list accounts, hand out signers
//! - Bound every provider wait and map provider errors to `WalletError`

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::timeout;

use crate::chain::descriptor::ChainDescriptor;
use crate::config::schema::SessionConfig;
use crate::error::{WalletError, WalletResult};
use crate::provider::{ProviderAccount, ProviderError, SigningHandle, SigningProvider};

/// Bounded, error-mapped access to the signing provider.
#[derive(Clone)]
pub struct SigningProviderGateway {
    provider: Option<Arc<dyn SigningProvider>>,
    descriptor: ChainDescriptor,
    wait: Duration,
    suggest_chain: bool,
}

impl SigningProviderGateway {
    /// Create a new gateway. `provider` is `None` when nothing is installed.
    pub fn new(
        provider: Option<Arc<dyn SigningProvider>>,
        descriptor: ChainDescriptor,
        config: &SessionConfig,
    ) -> Self {
        Self {
            provider,
            descriptor,
            wait: Duration::from_secs(config.authorize_timeout_secs),
            suggest_chain: config.suggest_chain,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.descriptor.chain_id
    }

    /// Presence check; never prompts.
    pub fn is_available(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.is_available())
    }

    /// Offer the chain descriptor. Best-effort: failures are logged only.
    pub async fn suggest_chain(&self) {
        let Ok(provider) = self.provider() else {
            return;
        };
        match self.bounded(provider.suggest_chain(&self.descriptor)).await {
            Ok(()) => tracing::debug!(chain_id = %self.descriptor.chain_id, "Chain suggested to provider"),
            Err(e) => tracing::warn!(
                chain_id = %self.descriptor.chain_id,
                error = %e,
                "Chain suggestion failed, continuing with authorization"
            ),
        }
    }

    /// Ask the user to authorize the chain.
    pub async fn authorize(&self) -> WalletResult<()> {
        let provider = self.provider()?;
        self.bounded(provider.enable(&self.descriptor.chain_id)).await
    }

    /// Accounts in provider order.
    pub async fn get_accounts(&self) -> WalletResult<Vec<ProviderAccount>> {
        let provider = self.provider()?;
        self.bounded(provider.accounts(&self.descriptor.chain_id)).await
    }

    /// Opaque signer for the chain.
    pub async fn get_signing_handle(&self) -> WalletResult<SigningHandle> {
        let provider = self.provider()?;
        self.bounded(provider.offline_signer(&self.descriptor.chain_id))
            .await
            .map(SigningHandle::new)
    }

    /// Account-change notifications. Closed immediately without a provider.
    pub fn subscribe_account_changes(&self) -> broadcast::Receiver<()> {
        match &self.provider {
            Some(provider) => provider.subscribe_account_changes(),
            None => broadcast::channel(1).1,
        }
    }

    /// Full connect sequence: suggest, authorize, pick the first account,
    /// fetch its signer.
    pub(crate) async fn establish(&self) -> WalletResult<(String, SigningHandle)> {
        if !self.is_available() {
            return Err(WalletError::ExtensionNotFound);
        }
        if self.suggest_chain {
            self.suggest_chain().await;
        }

        self.authorize().await?;

        let account = self
            .get_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccountsAvailable)?;
        let handle = self.get_signing_handle().await?;

        Ok((account.address, handle))
    }

    fn provider(&self) -> WalletResult<&Arc<dyn SigningProvider>> {
        self.provider.as_ref().ok_or(WalletError::ExtensionNotFound)
    }

    async fn bounded<T, F>(&self, fut: F) -> WalletResult<T>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match timeout(self.wait, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_provider_error(e)),
            Err(_) => Err(WalletError::AuthorizationTimeout(self.wait.as_secs())),
        }
    }
}

impl std::fmt::Debug for SigningProviderGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningProviderGateway")
            .field("chain_id", &self.descriptor.chain_id)
            .field("provider", &self.provider.is_some())
            .field("wait_secs", &self.wait.as_secs())
            .finish()
    }
}

fn map_provider_error(e: ProviderError) -> WalletError {
    match e {
        ProviderError::NotInstalled => WalletError::ExtensionNotFound,
        ProviderError::Rejected => WalletError::UserRejectedConnection,
        ProviderError::Failed(message) => WalletError::Unknown(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::types::ChainConfig;
    use crate::provider::{OfflineSigner, SignedTx};
    use crate::tx::types::SignDoc;
    use async_trait::async_trait;

    struct StubSigner;

    #[async_trait]
    impl OfflineSigner for StubSigner {
        async fn sign(&self, _signer: &str, _doc: &SignDoc) -> Result<SignedTx, ProviderError> {
            Ok(SignedTx { tx_bytes: vec![] })
        }
    }

    struct StubProvider {
        enable: Result<(), ProviderError>,
        accounts: Vec<&'static str>,
        suggest_fails: bool,
        enable_delay: Duration,
        changes: broadcast::Sender<()>,
    }

    impl StubProvider {
        fn new(accounts: Vec<&'static str>) -> Self {
            Self {
                enable: Ok(()),
                accounts,
                suggest_fails: false,
                enable_delay: Duration::ZERO,
                changes: broadcast::channel(4).0,
            }
        }
    }

    #[async_trait]
    impl SigningProvider for StubProvider {
        fn is_available(&self) -> bool {
            true
        }

        async fn suggest_chain(&self, _chain: &ChainDescriptor) -> Result<(), ProviderError> {
            if self.suggest_fails {
                Err(ProviderError::Failed("unsupported".into()))
            } else {
                Ok(())
            }
        }

        async fn enable(&self, _chain_id: &str) -> Result<(), ProviderError> {
            tokio::time::sleep(self.enable_delay).await;
            self.enable.clone()
        }

        async fn accounts(&self, _chain_id: &str) -> Result<Vec<ProviderAccount>, ProviderError> {
            Ok(self
                .accounts
                .iter()
                .map(|a| ProviderAccount { address: a.to_string() })
                .collect())
        }

        async fn offline_signer(&self, _chain_id: &str) -> Result<Arc<dyn OfflineSigner>, ProviderError> {
            Ok(Arc::new(StubSigner))
        }

        fn subscribe_account_changes(&self) -> broadcast::Receiver<()> {
            self.changes.subscribe()
        }
    }

    fn gateway(provider: Option<StubProvider>, wait_secs: u64) -> SigningProviderGateway {
        let config = SessionConfig {
            authorize_timeout_secs: wait_secs,
            ..SessionConfig::default()
        };
        SigningProviderGateway::new(
            provider.map(|p| Arc::new(p) as Arc<dyn SigningProvider>),
            ChainDescriptor::from_config(&ChainConfig::default()),
            &config,
        )
    }

    #[tokio::test]
    async fn test_establish_picks_first_account() {
        let gw = gateway(Some(StubProvider::new(vec!["kale1first", "kale1second"])), 5);
        let (address, _handle) = gw.establish().await.unwrap();
        assert_eq!(address, "kale1first");
    }

    #[tokio::test]
    async fn test_missing_provider() {
        let gw = gateway(None, 5);
        assert!(!gw.is_available());
        assert_eq!(gw.establish().await.unwrap_err(), WalletError::ExtensionNotFound);

        let mut rx = gw.subscribe_account_changes();
        assert!(rx.recv().await.is_err());
    }

    #[tokio::test]
    async fn test_rejection_and_empty_accounts() {
        let mut rejecting = StubProvider::new(vec!["kale1a"]);
        rejecting.enable = Err(ProviderError::Rejected);
        assert_eq!(
            gateway(Some(rejecting), 5).establish().await.unwrap_err(),
            WalletError::UserRejectedConnection
        );

        assert_eq!(
            gateway(Some(StubProvider::new(vec![])), 5).establish().await.unwrap_err(),
            WalletError::NoAccountsAvailable
        );
    }

    #[tokio::test]
    async fn test_suggest_failure_is_not_fatal() {
        let mut provider = StubProvider::new(vec!["kale1a"]);
        provider.suggest_fails = true;
        assert!(gateway(Some(provider), 5).establish().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_authorization_is_bounded() {
        let mut provider = StubProvider::new(vec!["kale1a"]);
        provider.enable_delay = Duration::from_secs(600);
        let err = gateway(Some(provider), 120).establish().await.unwrap_err();
        assert_eq!(err, WalletError::AuthorizationTimeout(120));
    }
}
