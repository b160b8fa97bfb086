//! Transaction signing and broadcast.
//!
//! # Responsibilities
//! - Refuse to do anything without a connected session
//! - Fetch signer bookkeeping, sign through the session's handle, broadcast
//! - Optionally wait for block inclusion
//! - Surface chain rejections verbatim; never retry

use std::time::Duration;

use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::config::schema::NodeConfig;
use crate::error::{WalletError, WalletResult};
use crate::node::client::NodeClient;
use crate::node::types::TxResponse;
use crate::observability::metrics;
use crate::provider::ProviderError;
use crate::session::state::SessionView;
use crate::tx::types::{SignDoc, TransactionRequest, TransactionResult};

/// Signs and submits transactions for the current session.
#[derive(Debug, Clone)]
pub struct TransactionBroadcaster {
    session: SessionView,
    node: NodeClient,
    chain_id: String,
    await_inclusion: bool,
    inclusion_timeout: Duration,
    poll_interval: Duration,
}

impl TransactionBroadcaster {
    /// Create a new broadcaster.
    pub fn new(session: SessionView, node: NodeClient, config: &NodeConfig) -> Self {
        let chain_id = node.chain_id().to_string();
        Self {
            session,
            node,
            chain_id,
            await_inclusion: config.await_inclusion,
            inclusion_timeout: Duration::from_secs(config.inclusion_timeout_secs),
            poll_interval: Duration::from_millis(config.inclusion_poll_ms),
        }
    }

    /// Sign and broadcast `request` as the connected account.
    pub async fn submit(&self, request: TransactionRequest) -> WalletResult<TransactionResult> {
        let result = self.submit_inner(request).await;
        match &result {
            Ok(_) => metrics::record_submission("accepted"),
            Err(e) => metrics::record_submission(e.kind()),
        }
        result
    }

    async fn submit_inner(&self, request: TransactionRequest) -> WalletResult<TransactionResult> {
        let session = self.session.snapshot();
        let (address, handle) = session.credentials().ok_or(WalletError::SessionNotConnected)?;

        if request.messages.is_empty() {
            return Err(WalletError::InvalidActionInput(
                "transaction has no messages".to_string(),
            ));
        }
        if let Some(msg) = request.messages.iter().find(|m| m.sender != address) {
            return Err(WalletError::InvalidActionInput(format!(
                "message sender {} is not the connected account {}",
                msg.sender, address
            )));
        }

        let account = self
            .node
            .account(address)
            .await?
            .ok_or_else(|| WalletError::AccountNotFound(address.to_string()))?;

        let doc = SignDoc {
            chain_id: self.chain_id.clone(),
            account_number: account.account_number,
            sequence: account.sequence,
            fee: request.fee,
            msgs: request.messages,
            memo: request.memo.unwrap_or_default(),
        };

        tracing::debug!(
            address = %address,
            account_number = doc.account_number,
            sequence = doc.sequence,
            messages = doc.msgs.len(),
            "Requesting signature"
        );

        let signed = handle.sign(address, &doc).await.map_err(|e| match e {
            ProviderError::Rejected => WalletError::UserRejectedSignature,
            ProviderError::NotInstalled => WalletError::ExtensionNotFound,
            ProviderError::Failed(message) => WalletError::Unknown(message),
        })?;

        let response = self.node.broadcast_tx_sync(&signed.tx_bytes).await?;
        if response.code != 0 {
            tracing::warn!(
                tx_hash = %response.hash,
                code = response.code,
                codespace = %response.codespace,
                log = %response.log,
                "Transaction rejected at broadcast"
            );
            return Err(WalletError::TransactionRejectedByChain {
                code: response.code,
                raw_log: response.log,
            });
        }

        tracing::info!(tx_hash = %response.hash, "Transaction broadcast");

        if !self.await_inclusion {
            return Ok(TransactionResult {
                code: 0,
                transaction_hash: Some(response.hash),
                raw_log: response.log,
                height: None,
            });
        }

        let included = self.wait_for_inclusion(&response.hash).await?;
        if included.tx_result.code != 0 {
            tracing::warn!(
                tx_hash = %response.hash,
                height = included.height,
                code = included.tx_result.code,
                log = %included.tx_result.log,
                "Transaction failed in block"
            );
            return Err(WalletError::TransactionRejectedByChain {
                code: included.tx_result.code,
                raw_log: included.tx_result.log,
            });
        }

        tracing::info!(tx_hash = %response.hash, height = included.height, "Transaction included");

        Ok(TransactionResult {
            code: 0,
            transaction_hash: Some(response.hash),
            raw_log: included.tx_result.log,
            height: Some(included.height),
        })
    }

    /// Poll until the transaction shows up in a block. Lookup failures are
    /// treated as "not yet"; only the overall deadline ends the wait.
    async fn wait_for_inclusion(&self, tx_hash: &str) -> WalletResult<TxResponse> {
        let result = timeout(self.inclusion_timeout, async {
            let mut ticker = interval(self.poll_interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match self.node.tx(tx_hash).await {
                    Ok(Some(tx)) => return tx,
                    Ok(None) => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                    Err(e) => tracing::debug!(tx_hash = %tx_hash, error = %e, "Inclusion lookup failed"),
                }
            }
        })
        .await;

        match result {
            Ok(tx) => Ok(tx),
            Err(_) => {
                tracing::warn!(
                    tx_hash = %tx_hash,
                    timeout_secs = self.inclusion_timeout.as_secs(),
                    "Transaction not seen on chain before deadline"
                );
                Err(WalletError::ConfirmationTimeout {
                    tx_hash: tx_hash.to_string(),
                    secs: self.inclusion_timeout.as_secs(),
                })
            }
        }
    }
}
