//! HTTP bridge to a locally running signing provider.
//!
//! The bridge process owns the keys and the approval UI; this client only
//! forwards requests.
//!
//! ```text
//! POST /suggest-chain   ChainDescriptor
//! POST /enable          {"chain_id"}
//! GET  /accounts        ?chain_id=  → {"accounts": [{"address"}]}
//! POST /sign            {"chain_id", "signer", "sign_doc"} → {"tx_bytes": base64}
//! GET  /keystore        → {"fingerprint"}
//! ```
//!
//! 401/403 mean the user declined. A bridge that cannot be reached is
//! reported as not installed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use url::Url;

use crate::chain::descriptor::ChainDescriptor;
use crate::provider::{OfflineSigner, ProviderAccount, ProviderError, SignedTx, SigningProvider};
use crate::tx::types::SignDoc;

#[derive(Serialize)]
struct EnableRequest<'a> {
    chain_id: &'a str,
}

#[derive(Deserialize)]
struct AccountsResponse {
    accounts: Vec<ProviderAccount>,
}

#[derive(Serialize)]
struct SignRequest<'a> {
    chain_id: &'a str,
    signer: &'a str,
    sign_doc: &'a SignDoc,
}

#[derive(Deserialize)]
struct SignResponse {
    tx_bytes: String,
}

#[derive(Deserialize)]
struct KeystoreResponse {
    fingerprint: String,
}

struct BridgeInner {
    http: reqwest::Client,
    base: Url,
    changes: broadcast::Sender<()>,
}

/// `SigningProvider` backed by the local bridge.
#[derive(Clone)]
pub struct BridgeProvider {
    inner: Arc<BridgeInner>,
}

impl BridgeProvider {
    /// Create a new bridge client. No I/O happens here.
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        let base = Url::parse(base_url)
            .map_err(|e| ProviderError::Failed(format!("invalid bridge url '{}': {}", base_url, e)))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Failed(e.to_string()))?;
        let (changes, _) = broadcast::channel(16);

        Ok(Self {
            inner: Arc::new(BridgeInner {
                http,
                base,
                changes,
            }),
        })
    }

    /// Poll the keystore fingerprint and emit an account-change notification
    /// whenever it moves. Runs until `shutdown` fires.
    pub async fn watch_keystore(self, interval: Duration, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut last: Option<String> = None;

        tracing::info!(interval_ms = interval.as_millis() as u64, "Keystore watcher started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.keystore_fingerprint().await {
                        Ok(fingerprint) => {
                            if last.as_ref().is_some_and(|prev| *prev != fingerprint) {
                                tracing::info!("Provider keystore changed");
                                let _ = self.inner.changes.send(());
                            }
                            last = Some(fingerprint);
                        }
                        Err(e) => tracing::debug!(error = %e, "Keystore poll failed"),
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Keystore watcher shutting down");
                    break;
                }
            }
        }
    }

    async fn keystore_fingerprint(&self) -> Result<String, ProviderError> {
        let response = self.send(self.inner.http.get(self.url("keystore")?)).await?;
        let body: KeystoreResponse = decode(response).await?;
        Ok(body.fingerprint)
    }

    fn url(&self, path: &str) -> Result<Url, ProviderError> {
        self.inner
            .base
            .join(path)
            .map_err(|e| ProviderError::Failed(e.to_string()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ProviderError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => return Err(ProviderError::NotInstalled),
            Err(e) => return Err(ProviderError::Failed(e.to_string())),
        };

        match response.status() {
            status if status.is_success() => Ok(response),
            status => Err(status_error(status, response.text().await.unwrap_or_default())),
        }
    }
}

#[async_trait]
impl SigningProvider for BridgeProvider {
    /// A configured bridge counts as installed; reachability is only known
    /// once a request is made.
    fn is_available(&self) -> bool {
        true
    }

    async fn suggest_chain(&self, chain: &ChainDescriptor) -> Result<(), ProviderError> {
        let request = self.inner.http.post(self.url("suggest-chain")?).json(chain);
        self.send(request).await.map(|_| ())
    }

    async fn enable(&self, chain_id: &str) -> Result<(), ProviderError> {
        let request = self
            .inner
            .http
            .post(self.url("enable")?)
            .json(&EnableRequest { chain_id });
        self.send(request).await.map(|_| ())
    }

    async fn accounts(&self, chain_id: &str) -> Result<Vec<ProviderAccount>, ProviderError> {
        let request = self
            .inner
            .http
            .get(self.url("accounts")?)
            .query(&[("chain_id", chain_id)]);
        let body: AccountsResponse = decode(self.send(request).await?).await?;
        Ok(body.accounts)
    }

    async fn offline_signer(&self, chain_id: &str) -> Result<Arc<dyn OfflineSigner>, ProviderError> {
        Ok(Arc::new(BridgeSigner {
            bridge: self.clone(),
            chain_id: chain_id.to_string(),
        }))
    }

    fn subscribe_account_changes(&self) -> broadcast::Receiver<()> {
        self.inner.changes.subscribe()
    }
}

impl std::fmt::Debug for BridgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeProvider")
            .field("base", &self.inner.base.as_str())
            .finish()
    }
}

/// Signer that forwards sign docs to the bridge.
struct BridgeSigner {
    bridge: BridgeProvider,
    chain_id: String,
}

#[async_trait]
impl OfflineSigner for BridgeSigner {
    async fn sign(&self, signer: &str, doc: &SignDoc) -> Result<SignedTx, ProviderError> {
        let request = self.bridge.inner.http.post(self.bridge.url("sign")?).json(&SignRequest {
            chain_id: &self.chain_id,
            signer,
            sign_doc: doc,
        });
        let body: SignResponse = decode(self.bridge.send(request).await?).await?;
        let tx_bytes = STANDARD
            .decode(body.tx_bytes)
            .map_err(|e| ProviderError::Failed(format!("bridge returned invalid tx bytes: {}", e)))?;
        Ok(SignedTx { tx_bytes })
    }
}

async fn decode<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T, ProviderError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Failed(format!("invalid bridge response: {}", e)))
}

fn status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Rejected,
        _ => ProviderError::Failed(format!("bridge returned HTTP {}: {}", status.as_u16(), body)),
    }
}
