//! Read-only query client.
//!
//! Created once at startup and shared by every session. Construction never
//! fails: when the node cannot be reached the session stays usable for
//! signing and the client is flagged as unavailable until `retry_connect`
//! succeeds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::chain::types::Coin;
use crate::error::{WalletError, WalletResult};
use crate::node::client::NodeClient;
use crate::observability::metrics;

/// Query handle over a `NodeClient`, cheap to clone.
#[derive(Debug, Clone)]
pub struct QueryClient {
    node: NodeClient,
    available: Arc<AtomicBool>,
}

impl QueryClient {
    /// Probe the node and build the query handle. Failure to reach the node
    /// is logged and recorded, never returned.
    pub async fn connect(node: NodeClient) -> Self {
        let client = Self {
            node,
            available: Arc::new(AtomicBool::new(false)),
        };
        client.probe().await;
        client
    }

    /// Whether reads are currently served.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Probe the node again. Returns the new availability.
    pub async fn retry_connect(&self) -> bool {
        self.probe().await
    }

    pub fn node(&self) -> &NodeClient {
        &self.node
    }

    /// Latest block height seen by the node.
    pub async fn latest_height(&self) -> WalletResult<u64> {
        self.ensure_available()?;
        let status = self.node.status().await?;
        Ok(status.latest_block_height)
    }

    /// Balance of `denom` held by `address`.
    pub async fn balance(&self, address: &str, denom: &str) -> WalletResult<Coin> {
        self.ensure_available()?;
        Ok(self.node.balance(address, denom).await?)
    }

    /// Smart query against a contract.
    pub async fn smart_query(&self, contract: &str, query: &Value) -> WalletResult<Value> {
        self.ensure_available()?;
        Ok(self.node.smart_query(contract, query).await?)
    }

    fn ensure_available(&self) -> WalletResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(WalletError::NetworkUnavailable(format!(
                "query client for {} is not connected",
                self.node.rpc_url()
            )))
        }
    }

    async fn probe(&self) -> bool {
        let available = match self.node.verify_chain_id().await {
            Ok(status) => {
                tracing::info!(
                    chain_id = %status.network,
                    height = status.latest_block_height,
                    "Query client connected"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    rpc = %self.node.rpc_url(),
                    error = %e,
                    "Query client unavailable, reads disabled"
                );
                false
            }
        };
        self.available.store(available, Ordering::Release);
        metrics::set_reads_available(available);
        available
    }
}
