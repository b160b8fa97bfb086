//! Account-change listener.
//!
//! Subscribes once to the provider's account-change notifications and
//! reconciles the session for each one until shutdown. Dropping the receiver
//! on exit is the unsubscribe.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::session::manager::WalletSessionManager;

/// Spawn the listener task.
pub fn spawn_account_listener(
    manager: &WalletSessionManager,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    let manager = manager.clone();
    let mut changes = manager.gateway().subscribe_account_changes();

    tokio::spawn(async move {
        tracing::info!("Account-change listener started");

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                change = changes.recv() => match change {
                    Ok(()) | Err(RecvError::Lagged(_)) => {
                        // A burst of switches needs only one reconciliation
                        drain(&mut changes);
                        tokio::select! {
                            _ = shutdown.recv() => break,
                            result = manager.handle_account_change() => {
                                if let Some(Err(e)) = result {
                                    tracing::warn!(error = %e, "Account-change reconciliation failed");
                                }
                            }
                        }
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("Account-change channel closed");
                        break;
                    }
                },
            }
        }

        tracing::info!("Account-change listener stopped");
    })
}

fn drain(changes: &mut broadcast::Receiver<()>) {
    loop {
        match changes.try_recv() {
            Ok(()) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
