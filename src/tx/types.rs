//! Transaction request, sign document and result types.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::actions::types::ExecuteMsg;
use crate::chain::types::Coin;

/// Flat fee with an explicit gas limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
}

/// Fee choice for a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeSpec {
    Fixed(StdFee),
    /// Let the signing provider simulate and fill in the fee.
    Auto,
}

impl Serialize for FeeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeeSpec::Auto => serializer.serialize_str("auto"),
            FeeSpec::Fixed(fee) => {
                let mut s = serializer.serialize_struct("StdFee", 2)?;
                s.serialize_field("amount", &fee.amount)?;
                s.serialize_field("gas", &fee.gas_limit.to_string())?;
                s.end()
            }
        }
    }
}

/// Messages to sign and broadcast together. Consumed by `submit()`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub messages: Vec<ExecuteMsg>,
    pub fee: FeeSpec,
    pub memo: Option<String>,
}

impl TransactionRequest {
    pub fn new(messages: Vec<ExecuteMsg>, fee: FeeSpec) -> Self {
        Self {
            messages,
            fee,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// Outcome of a submission the chain accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    /// 0 means accepted.
    pub code: u32,
    /// Present once the transaction was broadcast.
    pub transaction_hash: Option<String>,
    pub raw_log: String,
    /// Block height, when inclusion was observed.
    pub height: Option<u64>,
}

impl TransactionResult {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Everything the signer needs to produce transaction bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignDoc {
    pub chain_id: String,
    #[serde(serialize_with = "as_string")]
    pub account_number: u64,
    #[serde(serialize_with = "as_string")]
    pub sequence: u64,
    pub fee: FeeSpec,
    pub msgs: Vec<ExecuteMsg>,
    pub memo: String,
}

fn as_string<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
