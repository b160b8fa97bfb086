//! Domain action and contract message types.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::chain::amount::{format_units, DisplayAmount};
use crate::chain::types::Coin;

/// A user-level operation. Closed set: new actions need a new adapter arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractAction {
    /// Exchange `amount` of `token_in` for `token_out` on the AMM contract.
    Swap {
        token_in: String,
        token_out: String,
        /// Display units, as typed by the user.
        amount: DisplayAmount,
    },
    /// Follow a trader by staking on the social contract.
    Follow {
        target_address: String,
        /// Minimal units of the fee denomination.
        stake_amount: u128,
    },
}

impl ContractAction {
    /// Short label used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            ContractAction::Swap { .. } => "swap",
            ContractAction::Follow { .. } => "follow",
        }
    }
}

/// Contract-level payloads understood by the Kale contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KaleExecuteMsg {
    KaleSwap {
        amount: String,
        token_in: String,
        token_out: String,
    },
    KaleFollow {
        trader: String,
        stake_amount: String,
    },
}

/// One `MsgExecuteContract`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteMsg {
    pub sender: String,
    pub contract: String,
    /// Contract message, serialized as JSON.
    pub payload: Value,
    pub funds: Vec<Coin>,
}

impl ExecuteMsg {
    pub const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgExecuteContract";

    /// Payload as the JSON bytes the contract receives.
    pub fn payload_bytes(&self) -> Vec<u8> {
        // Serializing a Value cannot fail
        serde_json::to_vec(&self.payload).unwrap_or_default()
    }
}

impl Serialize for ExecuteMsg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct MsgBody<'a>(&'a ExecuteMsg);

        impl Serialize for MsgBody<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut s = serializer.serialize_struct("MsgExecuteContract", 4)?;
                s.serialize_field("sender", &self.0.sender)?;
                s.serialize_field("contract", &self.0.contract)?;
                s.serialize_field("msg", &self.0.payload)?;
                s.serialize_field("funds", &self.0.funds)?;
                s.end()
            }
        }

        let mut s = serializer.serialize_struct("Any", 2)?;
        s.serialize_field("type_url", Self::TYPE_URL)?;
        s.serialize_field("value", &MsgBody(self))?;
        s.end()
    }
}

/// Fee breakdown for a swap, in minimal units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub amount: u128,
    pub fee: u128,
    pub net_amount: u128,
    pub decimals: u8,
}

impl SwapQuote {
    pub fn amount_display(&self) -> String {
        format_units(self.amount, self.decimals)
    }

    pub fn fee_display(&self) -> String {
        format_units(self.fee, self.decimals)
    }

    pub fn net_display(&self) -> String {
        format_units(self.net_amount, self.decimals)
    }
}
