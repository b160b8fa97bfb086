//! Domain action → contract message translation.
//!
//! Pure and deterministic: no I/O, no clock, no randomness. Every input check
//! runs here so invalid actions fail before anything touches the network.

use crate::actions::types::{ContractAction, ExecuteMsg, KaleExecuteMsg, SwapQuote};
use crate::chain::amount::DisplayAmount;
use crate::chain::types::{ChainConfig, Coin};
use crate::config::schema::{ContractsConfig, FeeConfig};
use crate::error::{WalletError, WalletResult};
use crate::tx::types::{FeeSpec, StdFee, TransactionRequest};

/// Swap fee rate, 0.2%, applied to minimal units and rounded down.
const SWAP_FEE_NUMERATOR: u128 = 2;
const SWAP_FEE_DENOMINATOR: u128 = 1000;

/// Builds execute messages for the Kale contracts.
#[derive(Debug, Clone)]
pub struct ContractActionAdapter {
    chain: ChainConfig,
    contracts: ContractsConfig,
    fees: FeeConfig,
}

impl ContractActionAdapter {
    /// Create a new adapter for one chain and contract set.
    pub fn new(chain: ChainConfig, contracts: ContractsConfig, fees: FeeConfig) -> Self {
        Self {
            chain,
            contracts,
            fees,
        }
    }

    /// Translate an action into the execute message `sender` will sign.
    pub fn build(&self, sender: &str, action: &ContractAction) -> WalletResult<ExecuteMsg> {
        match action {
            ContractAction::Swap {
                token_in,
                token_out,
                amount,
            } => self.build_swap(sender, token_in, token_out, amount),
            ContractAction::Follow {
                target_address,
                stake_amount,
            } => self.build_follow(sender, target_address, *stake_amount),
        }
    }

    /// Fee and net amount for swapping `amount` display units.
    pub fn quote_swap(&self, amount: &DisplayAmount) -> WalletResult<SwapQuote> {
        let base = self.swap_base_units(amount)?;
        let fee = swap_fee(base);
        Ok(SwapQuote {
            amount: base,
            fee,
            net_amount: base - fee,
            decimals: self.chain.decimals,
        })
    }

    /// Wrap messages with the configured default fee.
    pub fn request(&self, messages: Vec<ExecuteMsg>) -> TransactionRequest {
        let fee = if self.fees.auto {
            FeeSpec::Auto
        } else {
            FeeSpec::Fixed(StdFee {
                amount: vec![Coin::new(&self.chain.fee_denom, u128::from(self.fees.amount))],
                gas_limit: self.fees.gas_limit,
            })
        };
        TransactionRequest::new(messages, fee)
    }

    fn build_swap(
        &self,
        sender: &str,
        token_in: &str,
        token_out: &str,
        amount: &DisplayAmount,
    ) -> WalletResult<ExecuteMsg> {
        let token_in = token_in.trim();
        let token_out = token_out.trim();
        if token_in.is_empty() || token_out.is_empty() {
            return Err(invalid("swap tokens must not be empty"));
        }
        if token_in == token_out {
            return Err(invalid(format!("cannot swap {} for itself", token_in)));
        }
        if amount.is_zero() {
            return Err(invalid("swap amount must be greater than 0"));
        }
        let base = self.swap_base_units(amount)?;

        let payload = KaleExecuteMsg::KaleSwap {
            amount: base.to_string(),
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
        };

        Ok(ExecuteMsg {
            sender: sender.to_string(),
            contract: self.contracts.amm.clone(),
            payload: to_payload(&payload)?,
            funds: vec![Coin::new(token_in, base)],
        })
    }

    fn build_follow(&self, sender: &str, target: &str, stake_amount: u128) -> WalletResult<ExecuteMsg> {
        let target = target.trim();
        if target.is_empty() {
            return Err(invalid("trader address must not be empty"));
        }
        if target == sender {
            return Err(invalid("cannot follow your own address"));
        }
        if stake_amount == 0 {
            return Err(invalid("stake amount must be greater than 0"));
        }

        let payload = KaleExecuteMsg::KaleFollow {
            trader: target.to_string(),
            stake_amount: stake_amount.to_string(),
        };

        Ok(ExecuteMsg {
            sender: sender.to_string(),
            contract: self.contracts.social.clone(),
            payload: to_payload(&payload)?,
            funds: vec![Coin::new(
                &self.chain.fee_denom,
                u128::from(self.contracts.follow_stake),
            )],
        })
    }

    fn swap_base_units(&self, amount: &DisplayAmount) -> WalletResult<u128> {
        amount
            .to_base_units(self.chain.decimals)
            .map_err(|e| invalid(e.to_string()))
    }
}

/// 0.2% of `amount_base`, rounded down.
pub fn swap_fee(amount_base: u128) -> u128 {
    // Divide first so huge amounts cannot overflow
    let whole = amount_base / SWAP_FEE_DENOMINATOR * SWAP_FEE_NUMERATOR;
    let rest = amount_base % SWAP_FEE_DENOMINATOR * SWAP_FEE_NUMERATOR / SWAP_FEE_DENOMINATOR;
    whole + rest
}

fn to_payload(msg: &KaleExecuteMsg) -> WalletResult<serde_json::Value> {
    serde_json::to_value(msg).map_err(|e| WalletError::Unknown(e.to_string()))
}

fn invalid(message: impl Into<String>) -> WalletError {
    WalletError::InvalidActionInput(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> ContractActionAdapter {
        ContractActionAdapter::new(
            ChainConfig::default(),
            ContractsConfig::default(),
            FeeConfig::default(),
        )
    }

    fn swap(amount: &str) -> ContractAction {
        ContractAction::Swap {
            token_in: "ukale".into(),
            token_out: "uusdc".into(),
            amount: amount.parse().unwrap(),
        }
    }

    #[test]
    fn test_swap_fee_is_exact() {
        let quote = adapter().quote_swap(&"100".parse().unwrap()).unwrap();
        assert_eq!(quote.fee, 200_000);
        assert_eq!(quote.net_amount, 99_800_000);
        assert_eq!(quote.fee_display(), "0.2");
        assert_eq!(quote.net_display(), "99.8");
    }

    #[test]
    fn test_swap_fee_rounds_down() {
        assert_eq!(swap_fee(499), 0);
        assert_eq!(swap_fee(500), 1);
        assert_eq!(swap_fee(1_999), 3);
        assert_eq!(swap_fee(u128::MAX), u128::MAX / 500);
    }

    #[test]
    fn test_quote_zero_amount() {
        let quote = adapter().quote_swap(&"0".parse().unwrap()).unwrap();
        assert_eq!(quote.amount, 0);
        assert_eq!(quote.fee, 0);
        assert_eq!(quote.net_amount, 0);
    }

    #[test]
    fn test_build_swap_message() {
        let msg = adapter().build("kale1sender", &swap("1.5")).unwrap();

        assert_eq!(msg.contract, "kale-amm");
        assert_eq!(msg.payload["kale_swap"]["amount"], "1500000");
        assert_eq!(msg.payload["kale_swap"]["token_out"], "uusdc");
        assert_eq!(msg.funds, vec![Coin::new("ukale", 1_500_000)]);
    }

    #[test]
    fn test_swap_rejects_bad_input() {
        let adapter = adapter();
        for action in [
            swap("0"),
            swap("0.0000001"),
            ContractAction::Swap {
                token_in: "ukale".into(),
                token_out: "ukale".into(),
                amount: "1".parse().unwrap(),
            },
            ContractAction::Swap {
                token_in: " ".into(),
                token_out: "uusdc".into(),
                amount: "1".parse().unwrap(),
            },
        ] {
            let err = adapter.build("kale1sender", &action).unwrap_err();
            assert!(matches!(err, WalletError::InvalidActionInput(_)), "{:?}", action);
        }
    }

    #[test]
    fn test_follow_uses_fixed_stake_funds() {
        let msg = adapter()
            .build(
                "kale1sender",
                &ContractAction::Follow {
                    target_address: "kale1trader".into(),
                    stake_amount: 2_500,
                },
            )
            .unwrap();

        assert_eq!(msg.contract, "kale-social");
        assert_eq!(msg.payload["kale_follow"]["trader"], "kale1trader");
        assert_eq!(msg.payload["kale_follow"]["stake_amount"], "2500");
        assert_eq!(msg.funds, vec![Coin::new("ukale", 100)]);
    }

    #[test]
    fn test_follow_empty_target_fails() {
        let err = adapter()
            .build(
                "kale1sender",
                &ContractAction::Follow {
                    target_address: "   ".into(),
                    stake_amount: 100,
                },
            )
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidActionInput(_)));
    }

    #[test]
    fn test_follow_self_fails() {
        let err = adapter()
            .build(
                "kale1sender",
                &ContractAction::Follow {
                    target_address: "kale1sender".into(),
                    stake_amount: 100,
                },
            )
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidActionInput(_)));
    }

    #[test]
    fn test_request_uses_default_fee() {
        let request = adapter().request(vec![]);
        assert_eq!(
            request.fee,
            FeeSpec::Fixed(StdFee {
                amount: vec![Coin::new("ukale", 5000)],
                gas_limit: 200_000,
            })
        );
        assert!(request.memo.is_none());
    }
}
