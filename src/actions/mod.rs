//! Domain actions subsystem.
//!
//! # Data Flow
//! ```text
//! UI input (display units, addresses)
//!     → ContractAction (Swap | Follow)
//!     → adapter.rs (validate, fixed-point fee math, payload)
//!     → ExecuteMsg (MsgExecuteContract)
//!     → TransactionRequest (default fee) → tx::broadcaster
//! ```
//!
//! # Design Decisions
//! - Validation happens before any I/O and raises `InvalidActionInput`
//! - Amounts are integers in minimal units; no floating point anywhere

pub mod adapter;
pub mod types;

pub use adapter::{swap_fee, ContractActionAdapter};
pub use types::{ContractAction, ExecuteMsg, KaleExecuteMsg, SwapQuote};
