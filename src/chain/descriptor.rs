//! Provider-facing chain description.
//!
//! Handed to the signing provider's `suggest_chain` so it can add a chain it
//! does not know yet. Field names follow the camelCase layout wallet
//! extensions expect.

use serde::{Deserialize, Serialize};

use crate::config::schema::{ChainConfig, GasPriceStep};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    pub coin_type: u32,
}

/// Bech32 prefixes for every address kind on the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    pub bech32_prefix_acc_addr: String,
    pub bech32_prefix_acc_pub: String,
    pub bech32_prefix_val_addr: String,
    pub bech32_prefix_val_pub: String,
    pub bech32_prefix_cons_addr: String,
    pub bech32_prefix_cons_pub: String,
}

impl Bech32Config {
    /// Derive the standard Cosmos SDK prefix family from an account prefix.
    pub fn from_account_prefix(prefix: &str) -> Self {
        Self {
            bech32_prefix_acc_addr: prefix.to_string(),
            bech32_prefix_acc_pub: format!("{prefix}pub"),
            bech32_prefix_val_addr: format!("{prefix}valoper"),
            bech32_prefix_val_pub: format!("{prefix}valoperpub"),
            bech32_prefix_cons_addr: format!("{prefix}valcons"),
            bech32_prefix_cons_pub: format!("{prefix}valconspub"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCurrency {
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u8,
    pub gas_price_step: GasPriceStep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc: String,
    pub rest: String,
    pub bip44: Bip44,
    pub bech32_config: Bech32Config,
    pub currencies: Vec<Currency>,
    pub fee_currencies: Vec<FeeCurrency>,
    pub stake_currency: Currency,
}

impl ChainDescriptor {
    pub fn from_config(chain: &ChainConfig) -> Self {
        let native = Currency {
            coin_denom: chain.display_denom.clone(),
            coin_minimal_denom: chain.fee_denom.clone(),
            coin_decimals: chain.decimals,
        };

        Self {
            chain_id: chain.chain_id.clone(),
            chain_name: chain.chain_name.clone(),
            rpc: chain.rpc_endpoint.clone(),
            rest: chain.rest_endpoint.clone(),
            bip44: Bip44 {
                coin_type: chain.coin_type,
            },
            bech32_config: Bech32Config::from_account_prefix(&chain.bech32_prefix),
            currencies: vec![native.clone()],
            fee_currencies: vec![FeeCurrency {
                coin_denom: native.coin_denom.clone(),
                coin_minimal_denom: native.coin_minimal_denom.clone(),
                coin_decimals: native.coin_decimals,
                gas_price_step: chain.gas_price_step,
            }],
            stake_currency: native,
        }
    }
}
