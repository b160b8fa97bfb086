//! Wallet session manager.
//!
//! # Responsibilities
//! - Own the single session cell and every write to it
//! - Run at most one provider authorization at a time
//! - Reconcile the session when the provider switches accounts
//! - Publish a `SessionEvent` for every transition
//!
//! # Design Decisions
//! - State changes happen under a short `std::sync::Mutex` that is never
//!   held across an `.await`
//! - Each connect attempt and each disconnect bumps an epoch; a connect that
//!   finishes under an old epoch is discarded
//! - The connect itself runs in a spawned task so a caller dropping its
//!   future does not strand the session in `Connecting`

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::broadcast;
use tokio::task::AbortHandle;

use crate::chain::types::Coin;
use crate::config::schema::SessionConfig;
use crate::error::{WalletError, WalletResult};
use crate::node::query::QueryClient;
use crate::observability::metrics;
use crate::provider::gateway::SigningProviderGateway;
use crate::provider::SigningHandle;
use crate::session::state::{SessionEvent, SessionStatus, SessionView, WalletSession};

type ConnectOutcome = Shared<BoxFuture<'static, WalletResult<String>>>;

struct InFlight {
    epoch: u64,
    outcome: ConnectOutcome,
    abort: AbortHandle,
}

#[derive(Default)]
struct Control {
    epoch: u64,
    in_flight: Option<InFlight>,
}

struct ManagerInner {
    cell: Arc<ArcSwap<WalletSession>>,
    control: Mutex<Control>,
    gateway: SigningProviderGateway,
    query: QueryClient,
    events: broadcast::Sender<SessionEvent>,
    fee_denom: String,
}

/// Drives the session state machine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct WalletSessionManager {
    inner: Arc<ManagerInner>,
}

impl WalletSessionManager {
    /// Create a new manager in the `Disconnected` state.
    pub fn new(
        gateway: SigningProviderGateway,
        query: QueryClient,
        config: &SessionConfig,
        fee_denom: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(ManagerInner {
                cell: Arc::new(ArcSwap::from_pointee(WalletSession::default())),
                control: Mutex::new(Control::default()),
                gateway,
                query,
                events,
                fee_denom: fee_denom.into(),
            }),
        }
    }

    /// Connect to the signing provider and return the session address.
    ///
    /// Joins an attempt already in flight instead of starting another, and
    /// returns immediately when already connected.
    pub async fn connect(&self) -> WalletResult<String> {
        let outcome = {
            let mut control = self.inner.lock();

            if let Some(address) = self.inner.cell.load().address() {
                return Ok(address.to_string());
            }

            let joined = control.in_flight.as_ref().map(|in_flight| {
                tracing::debug!(epoch = in_flight.epoch, "Joining in-flight connect");
                in_flight.outcome.clone()
            });

            match joined {
                Some(outcome) => outcome,
                None => {
                    if !self.inner.gateway.is_available() {
                        tracing::warn!("Connect requested but no signing provider is available");
                        metrics::record_connect_attempt(WalletError::ExtensionNotFound.kind());
                        return Err(WalletError::ExtensionNotFound);
                    }
                    self.start_connect(&mut control)
                }
            }
        };

        outcome.await
    }

    /// Drop the session locally. Safe to call at any time; a second call is
    /// a no-op. The provider is not asked to revoke anything.
    pub fn disconnect(&self) {
        let mut control = self.inner.lock();
        let in_flight = control.in_flight.take();

        if in_flight.is_none() && self.inner.cell.load().status() == SessionStatus::Disconnected {
            return;
        }

        control.epoch += 1;
        if let Some(in_flight) = in_flight {
            tracing::info!(epoch = in_flight.epoch, "Abandoning in-flight connect");
            in_flight.abort.abort();
        }
        self.inner.transition(WalletSession::disconnected(None));
    }

    /// Re-establish the session after the provider switched accounts.
    ///
    /// Returns `None` when there was no connected session to reconcile.
    /// On failure the session ends `Disconnected` with the error recorded.
    pub async fn handle_account_change(&self) -> Option<WalletResult<String>> {
        let previous = self.snapshot();
        let Some(old_address) = previous.address() else {
            tracing::debug!(status = %previous.status(), "Account change ignored");
            return None;
        };
        tracing::info!(address = %old_address, "Provider account changed, reconnecting");

        self.disconnect();
        let result = self.connect().await;

        match &result {
            Ok(address) => tracing::info!(address = %address, "Session re-established"),
            Err(WalletError::ExtensionNotFound) => {
                // connect() leaves state untouched in this case; record it here
                let control = self.inner.lock();
                if control.in_flight.is_none()
                    && self.inner.cell.load().status() == SessionStatus::Disconnected
                {
                    self.inner
                        .transition(WalletSession::disconnected(Some(WalletError::ExtensionNotFound)));
                }
            }
            Err(e) => tracing::warn!(error = %e, "Reconnect after account change failed"),
        }

        Some(result)
    }

    /// Subscribe to session transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Read-only view of the session for other components.
    pub fn session(&self) -> SessionView {
        SessionView::new(self.inner.cell.clone())
    }

    pub fn snapshot(&self) -> Arc<WalletSession> {
        self.inner.cell.load_full()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.cell.load().status()
    }

    pub fn query_client(&self) -> &QueryClient {
        &self.inner.query
    }

    /// Fee-denomination balance of the connected account.
    pub async fn balance(&self) -> WalletResult<Coin> {
        let session = self.snapshot();
        let address = session.address().ok_or(WalletError::SessionNotConnected)?;
        self.inner.query.balance(address, &self.inner.fee_denom).await
    }

    pub(crate) fn gateway(&self) -> &SigningProviderGateway {
        &self.inner.gateway
    }

    /// Enter `Connecting` and spawn the provider round-trip. Caller holds the
    /// control lock.
    fn start_connect(&self, control: &mut Control) -> ConnectOutcome {
        control.epoch += 1;
        let epoch = control.epoch;
        self.inner.transition(WalletSession::connecting());
        tracing::info!(epoch, chain_id = %self.inner.gateway.chain_id(), "Connecting to signing provider");

        let worker = self.inner.clone();
        let task = tokio::spawn(async move {
            let result = worker.gateway.establish().await;
            worker.complete(epoch, result)
        });
        let abort = task.abort_handle();

        let waiter = self.inner.clone();
        let outcome = async move {
            match task.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => Err(WalletError::ConnectionSuperseded),
                Err(e) => {
                    let err = WalletError::Unknown(format!("connect task failed: {}", e));
                    let _ = waiter.complete(epoch, Err(err.clone()));
                    Err(err)
                }
            }
        }
        .boxed()
        .shared();

        control.in_flight = Some(InFlight {
            epoch,
            outcome: outcome.clone(),
            abort,
        });
        outcome
    }
}

impl ManagerInner {
    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply the result of the connect attempt started under `epoch`.
    fn complete(
        &self,
        epoch: u64,
        result: WalletResult<(String, SigningHandle)>,
    ) -> WalletResult<String> {
        let mut control = self.lock();
        if control.epoch != epoch {
            tracing::debug!(epoch, current = control.epoch, "Discarding stale connect result");
            return Err(WalletError::ConnectionSuperseded);
        }
        control.in_flight = None;

        match result {
            Ok((address, handle)) => {
                metrics::record_connect_attempt("success");
                self.transition(WalletSession::connected(address.clone(), handle));
                Ok(address)
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "Connect failed");
                metrics::record_connect_attempt(e.kind());
                self.transition(WalletSession::disconnected(Some(e.clone())));
                Err(e)
            }
        }
    }

    /// Publish `next`. Caller holds the control lock.
    fn transition(&self, next: WalletSession) {
        let previous = self.cell.load().status();
        let event = SessionEvent {
            previous,
            current: next.status(),
            address: next.address().map(str::to_string),
            error: next.last_error().cloned(),
        };
        self.cell.store(Arc::new(next));

        tracing::info!(
            from = %event.previous,
            to = %event.current,
            address = ?event.address,
            error = ?event.error.as_ref().map(WalletError::kind),
            "Session transition"
        );
        metrics::record_session_transition(event.previous.as_str(), event.current.as_str());
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for WalletSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSessionManager")
            .field("status", &self.status())
            .field("gateway", &self.inner.gateway)
            .finish()
    }
}
