//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize all subsystems in dependency order
//! - Start background tasks (account listener, keystore watcher)
//! - Expose the wired components as one `WalletCore`
//!
//! # Design Decisions
//! - Configuration is validated before it reaches `start`
//! - An unreachable node is not fatal: reads are flagged unavailable
//! - Background tasks start last

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::actions::adapter::ContractActionAdapter;
use crate::actions::types::{ContractAction, SwapQuote};
use crate::chain::amount::DisplayAmount;
use crate::chain::descriptor::ChainDescriptor;
use crate::config::schema::WalletConfig;
use crate::error::{WalletError, WalletResult};
use crate::lifecycle::shutdown::Shutdown;
use crate::node::client::NodeClient;
use crate::node::query::QueryClient;
use crate::node::types::NodeError;
use crate::provider::bridge::BridgeProvider;
use crate::provider::gateway::SigningProviderGateway;
use crate::provider::{ProviderError, SigningProvider};
use crate::session::listener::spawn_account_listener;
use crate::session::manager::WalletSessionManager;
use crate::tx::broadcaster::TransactionBroadcaster;
use crate::tx::types::TransactionResult;

/// Grace period for background tasks on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Node client: {0}")]
    Node(#[from] NodeError),

    #[error("Signing bridge: {0}")]
    Provider(#[from] ProviderError),
}

/// The wired wallet core: one session, one query client, one broadcaster.
pub struct WalletCore {
    config: WalletConfig,
    manager: WalletSessionManager,
    adapter: ContractActionAdapter,
    broadcaster: TransactionBroadcaster,
    shutdown: Shutdown,
    tasks: Vec<JoinHandle<()>>,
}

impl WalletCore {
    /// Start the core with an explicit provider (`None` = nothing installed).
    pub async fn start(
        config: WalletConfig,
        provider: Option<Arc<dyn SigningProvider>>,
    ) -> Result<Self, StartupError> {
        Self::start_with(config, provider, Shutdown::new(), Vec::new()).await
    }

    /// Start the core with the bridge named in `provider.bridge_url`, if any,
    /// and watch its keystore for account switches.
    pub async fn start_from_config(config: WalletConfig) -> Result<Self, StartupError> {
        let shutdown = Shutdown::new();
        let mut tasks = Vec::new();

        let provider: Option<Arc<dyn SigningProvider>> = match &config.provider.bridge_url {
            Some(url) => {
                let bridge = BridgeProvider::new(url)?;
                let interval = Duration::from_millis(config.provider.keystore_poll_ms);
                tasks.push(tokio::spawn(
                    bridge.clone().watch_keystore(interval, shutdown.subscribe()),
                ));
                tracing::info!(bridge_url = %url, "Using signing bridge");
                Some(Arc::new(bridge))
            }
            None => {
                tracing::info!("No signing bridge configured");
                None
            }
        };

        Self::start_with(config, provider, shutdown, tasks).await
    }

    async fn start_with(
        config: WalletConfig,
        provider: Option<Arc<dyn SigningProvider>>,
        shutdown: Shutdown,
        mut tasks: Vec<JoinHandle<()>>,
    ) -> Result<Self, StartupError> {
        tracing::info!(
            chain_id = %config.chain.chain_id,
            rpc = %config.chain.rpc_endpoint,
            "Starting wallet core"
        );

        let node = NodeClient::new(&config.chain, &config.node)?;
        let query = QueryClient::connect(node.clone()).await;

        let gateway = SigningProviderGateway::new(
            provider,
            ChainDescriptor::from_config(&config.chain),
            &config.session,
        );
        let manager = WalletSessionManager::new(
            gateway,
            query,
            &config.session,
            config.chain.fee_denom.clone(),
        );
        let adapter = ContractActionAdapter::new(
            config.chain.clone(),
            config.contracts.clone(),
            config.fees.clone(),
        );
        let broadcaster = TransactionBroadcaster::new(manager.session(), node, &config.node);

        tasks.push(spawn_account_listener(&manager, shutdown.subscribe()));

        tracing::info!("Wallet core started");

        Ok(Self {
            config,
            manager,
            adapter,
            broadcaster,
            shutdown,
            tasks,
        })
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn session_manager(&self) -> &WalletSessionManager {
        &self.manager
    }

    pub fn adapter(&self) -> &ContractActionAdapter {
        &self.adapter
    }

    pub fn broadcaster(&self) -> &TransactionBroadcaster {
        &self.broadcaster
    }

    pub fn query_client(&self) -> &QueryClient {
        self.manager.query_client()
    }

    pub async fn connect(&self) -> WalletResult<String> {
        self.manager.connect().await
    }

    pub fn disconnect(&self) {
        self.manager.disconnect();
    }

    pub fn quote_swap(&self, amount: &DisplayAmount) -> WalletResult<SwapQuote> {
        self.adapter.quote_swap(amount)
    }

    /// Build, sign and submit one domain action as the connected account.
    pub async fn execute(&self, action: &ContractAction) -> WalletResult<TransactionResult> {
        let session = self.manager.snapshot();
        let sender = session.address().ok_or(WalletError::SessionNotConnected)?;

        let msg = self.adapter.build(sender, action)?;
        tracing::info!(action = action.name(), sender = %sender, contract = %msg.contract, "Submitting action");

        self.broadcaster.submit(self.adapter.request(vec![msg])).await
    }

    /// Stop background tasks and drop the session.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down wallet core");
        self.shutdown.drain(self.tasks, SHUTDOWN_GRACE).await;
        self.manager.disconnect();
        tracing::info!("Shutdown complete");
    }
}

impl std::fmt::Debug for WalletCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletCore")
            .field("chain_id", &self.config.chain.chain_id)
            .field("manager", &self.manager)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}
