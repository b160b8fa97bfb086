//! Metrics collection.
//!
//! # Responsibilities
//! - Define wallet metrics (transitions, connect attempts, submissions)
//! - Record through the `metrics` facade; the embedding application installs
//!   an exporter if it wants one
//!
//! # Metrics
//! - `wallet_session_transitions_total` (counter): by `from`, `to`
//! - `wallet_connect_attempts_total` (counter): by `outcome`
//! - `wallet_tx_submissions_total` (counter): by `outcome`
//! - `wallet_reads_available` (gauge): 1=query client connected, 0=not

/// Record a session state change.
pub fn record_session_transition(from: &'static str, to: &'static str) {
    metrics::counter!("wallet_session_transitions_total", "from" => from, "to" => to).increment(1);
}

/// Record how a connect attempt ended (`success` or an error kind).
pub fn record_connect_attempt(outcome: &'static str) {
    metrics::counter!("wallet_connect_attempts_total", "outcome" => outcome).increment(1);
}

/// Record how a transaction submission ended (`accepted` or an error kind).
pub fn record_submission(outcome: &'static str) {
    metrics::counter!("wallet_tx_submissions_total", "outcome" => outcome).increment(1);
}

pub fn set_reads_available(available: bool) {
    metrics::gauge!("wallet_reads_available").set(if available { 1.0 } else { 0.0 });
}
