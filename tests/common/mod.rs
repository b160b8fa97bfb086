//! Shared utilities for integration tests: a scripted signing provider and a
//! programmable mock chain node.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use kale_wallet::chain::ChainDescriptor;
use kale_wallet::provider::{OfflineSigner, ProviderAccount, ProviderError, SignedTx, SigningProvider};
use kale_wallet::tx::SignDoc;
use kale_wallet::WalletConfig;

pub const ALICE: &str = "kale1alice";
pub const BOB: &str = "kale1bob";
pub const TX_HASH: &str = "9F2C6D0E";

/// Signing provider whose answers are set by the test.
pub struct ScriptedProvider {
    pub available: AtomicBool,
    pub reject_enable: AtomicBool,
    pub reject_sign: Arc<AtomicBool>,
    pub enable_calls: AtomicUsize,
    pub sign_calls: Arc<AtomicUsize>,
    pub enable_delay: Duration,
    accounts: Mutex<Vec<String>>,
    changes: broadcast::Sender<()>,
}

impl ScriptedProvider {
    pub fn new(accounts: &[&str]) -> Arc<Self> {
        Self::with_delay(accounts, Duration::ZERO)
    }

    pub fn with_delay(accounts: &[&str], enable_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            available: AtomicBool::new(true),
            reject_enable: AtomicBool::new(false),
            reject_sign: Arc::new(AtomicBool::new(false)),
            enable_calls: AtomicUsize::new(0),
            sign_calls: Arc::new(AtomicUsize::new(0)),
            enable_delay,
            accounts: Mutex::new(accounts.iter().map(|a| a.to_string()).collect()),
            changes: broadcast::channel(8).0,
        })
    }

    /// Simulate the user switching to `address` in the provider UI.
    pub fn switch_account(&self, address: &str) {
        *self.accounts.lock().unwrap() = vec![address.to_string()];
        let _ = self.changes.send(());
    }

    /// Emit an account-change notification without changing anything.
    pub fn notify_change(&self) {
        let _ = self.changes.send(());
    }

    pub fn enables(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }

    pub fn signs(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn as_provider(self: &Arc<Self>) -> Option<Arc<dyn SigningProvider>> {
        Some(self.clone() as Arc<dyn SigningProvider>)
    }
}

struct ScriptedSigner {
    reject: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl OfflineSigner for ScriptedSigner {
    async fn sign(&self, signer: &str, doc: &SignDoc) -> Result<SignedTx, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject.load(Ordering::SeqCst) {
            return Err(ProviderError::Rejected);
        }
        let body = json!({ "signer": signer, "doc": doc });
        Ok(SignedTx {
            tx_bytes: serde_json::to_vec(&body).unwrap(),
        })
    }
}

#[async_trait]
impl SigningProvider for ScriptedProvider {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn suggest_chain(&self, _chain: &ChainDescriptor) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn enable(&self, _chain_id: &str) -> Result<(), ProviderError> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.enable_delay).await;
        if self.reject_enable.load(Ordering::SeqCst) {
            Err(ProviderError::Rejected)
        } else {
            Ok(())
        }
    }

    async fn accounts(&self, _chain_id: &str) -> Result<Vec<ProviderAccount>, ProviderError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .map(|address| ProviderAccount {
                address: address.clone(),
            })
            .collect())
    }

    async fn offline_signer(&self, _chain_id: &str) -> Result<Arc<dyn OfflineSigner>, ProviderError> {
        Ok(Arc::new(ScriptedSigner {
            reject: self.reject_sign.clone(),
            calls: self.sign_calls.clone(),
        }))
    }

    fn subscribe_account_changes(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}

/// Handle to a running mock node.
pub struct MockNode {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests seen so far, as "METHOD /path?query".
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a programmable mock node. `handler` receives the method, the path
/// with query, and the body, and returns the status and JSON body.
pub async fn start_mock_node<F>(handler: F) -> MockNode
where
    F: Fn(&Method, &str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let log = requests.clone();
    let app = Router::new().fallback(move |method: Method, uri: Uri, body: String| {
        let handler = handler.clone();
        let log = log.clone();
        async move {
            let path = uri
                .path_and_query()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default();
            log.lock().unwrap().push(format!("{} {}", method, path));
            let (status, body) = (*handler)(&method, &path, &body);
            (StatusCode::from_u16(status).unwrap(), body)
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockNode { addr, requests }
}

/// Responses of a healthy chain: known account, accepting broadcasts,
/// transaction included on first lookup.
pub fn healthy_chain(method: &Method, path: &str, _body: &str) -> (u16, String) {
    if path.starts_with("/status") {
        return (200, status_body("kale-test-1"));
    }
    if path.starts_with("/cosmos/auth/v1beta1/accounts/") {
        return (200, account_body(&path["/cosmos/auth/v1beta1/accounts/".len()..]));
    }
    if path.starts_with("/cosmos/bank/v1beta1/balances/") {
        return (
            200,
            json!({ "balance": { "denom": "ukale", "amount": "1250000" } }).to_string(),
        );
    }
    if path.starts_with("/tx?") {
        return (200, tx_body(0, "executed"));
    }
    if *method == Method::POST && path == "/" {
        return (200, broadcast_body(0, ""));
    }
    (404, json!({ "code": 5, "message": "not found" }).to_string())
}

pub fn status_body(network: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": -1,
        "result": {
            "node_info": { "network": network },
            "sync_info": { "latest_block_height": "4821", "catching_up": false }
        }
    })
    .to_string()
}

pub fn account_body(address: &str) -> String {
    json!({
        "account": {
            "@type": "/cosmos.auth.v1beta1.BaseAccount",
            "address": address,
            "account_number": "7",
            "sequence": "3"
        }
    })
    .to_string()
}

pub fn broadcast_body(code: u32, log: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": "1",
        "result": { "code": code, "log": log, "codespace": if code == 0 { "" } else { "sdk" }, "hash": TX_HASH }
    })
    .to_string()
}

pub fn tx_body(code: u32, log: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": -1,
        "result": {
            "hash": TX_HASH,
            "height": "4822",
            "tx_result": { "code": code, "log": log }
        }
    })
    .to_string()
}

/// Config pointing both node endpoints at `url`.
pub fn config_for(url: &str) -> WalletConfig {
    let mut config = WalletConfig::default();
    config.chain.rpc_endpoint = url.to_string();
    config.chain.rest_endpoint = url.to_string();
    config.node.rpc_timeout_secs = 2;
    config.node.inclusion_poll_ms = 50;
    config.node.inclusion_timeout_secs = 2;
    config.session.authorize_timeout_secs = 5;
    config
}

/// Config pointing at a port nothing listens on.
pub fn unreachable_config() -> WalletConfig {
    config_for("http://127.0.0.1:1")
}
