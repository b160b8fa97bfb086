//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → whatever metrics recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (address, tx_hash, error kind) on every I/O boundary
//! - Metric updates are no-ops until a recorder is installed
//! - Signing handles and tx bytes never appear in logs

pub mod logging;
pub mod metrics;
