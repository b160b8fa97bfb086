//! `kale-wallet` command line.
//!
//! Offline commands (`chain`, `quote-swap`, `build-*`) only read the config.
//! Online commands talk to the node and, for `swap`/`follow`/`watch`, to the
//! signing bridge named in `provider.bridge_url`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use kale_wallet::actions::ContractAction;
use kale_wallet::chain::{ChainDescriptor, DisplayAmount};
use kale_wallet::config::loader::load_config;
use kale_wallet::lifecycle::signals::shutdown_signal;
use kale_wallet::observability::logging::init_logging;
use kale_wallet::{WalletConfig, WalletCore};

#[derive(Parser)]
#[command(name = "kale-wallet")]
#[command(about = "Wallet session and transaction CLI for the Kale chain", long_about = None)]
struct Cli {
    /// Path to a TOML config file; built-in testnet defaults otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the chain description offered to the signing provider
    Chain,
    /// Show node status and whether reads are available
    Status,
    /// Query an address balance
    Balance {
        address: String,
        #[arg(long)]
        denom: Option<String>,
    },
    /// Show the swap fee and net amount for a display amount
    QuoteSwap { amount: DisplayAmount },
    /// Print the execute message for a swap without signing
    BuildSwap {
        #[arg(long)]
        from: String,
        #[arg(long)]
        token_in: String,
        #[arg(long)]
        token_out: String,
        #[arg(long)]
        amount: DisplayAmount,
    },
    /// Print the execute message for a follow without signing
    BuildFollow {
        #[arg(long)]
        from: String,
        #[arg(long)]
        trader: String,
        #[arg(long)]
        stake: u128,
    },
    /// Connect through the bridge, then sign and submit a swap
    Swap {
        #[arg(long)]
        token_in: String,
        #[arg(long)]
        token_out: String,
        #[arg(long)]
        amount: DisplayAmount,
    },
    /// Connect through the bridge, then sign and submit a follow
    Follow {
        #[arg(long)]
        trader: String,
        #[arg(long)]
        stake: u128,
    },
    /// Connect and print session events until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WalletConfig::default(),
    };
    init_logging(&config.observability);

    match cli.command {
        Commands::Chain => {
            print_json(&ChainDescriptor::from_config(&config.chain))?;
        }
        Commands::QuoteSwap { amount } => {
            let quote = adapter(&config).quote_swap(&amount)?;
            print_json(&json!({
                "amount": quote.amount_display(),
                "fee": quote.fee_display(),
                "net_amount": quote.net_display(),
                "denom": config.chain.display_denom,
            }))?;
        }
        Commands::BuildSwap {
            from,
            token_in,
            token_out,
            amount,
        } => {
            let action = ContractAction::Swap {
                token_in,
                token_out,
                amount,
            };
            print_json(&adapter(&config).build(&from, &action)?)?;
        }
        Commands::BuildFollow { from, trader, stake } => {
            let action = ContractAction::Follow {
                target_address: trader,
                stake_amount: stake,
            };
            print_json(&adapter(&config).build(&from, &action)?)?;
        }
        Commands::Status => {
            let core = WalletCore::start(config, None).await?;
            let query = core.query_client();
            let height = match query.latest_height().await {
                Ok(height) => json!(height),
                Err(_) => json!(null),
            };
            print_json(&json!({
                "chain_id": core.config().chain.chain_id,
                "rpc": query.node().rpc_url().as_str(),
                "reads_available": query.is_available(),
                "latest_height": height,
            }))?;
            core.shutdown().await;
        }
        Commands::Balance { address, denom } => {
            let denom = denom.unwrap_or_else(|| config.chain.fee_denom.clone());
            let core = WalletCore::start(config, None).await?;
            let coin = core.query_client().balance(&address, &denom).await?;
            print_json(&coin)?;
            core.shutdown().await;
        }
        Commands::Swap {
            token_in,
            token_out,
            amount,
        } => {
            let action = ContractAction::Swap {
                token_in,
                token_out,
                amount,
            };
            submit(config, action).await?;
        }
        Commands::Follow { trader, stake } => {
            let action = ContractAction::Follow {
                target_address: trader,
                stake_amount: stake,
            };
            submit(config, action).await?;
        }
        Commands::Watch => {
            let core = WalletCore::start_from_config(config).await?;
            let mut events = core.session_manager().subscribe();
            let address = core.connect().await?;
            eprintln!("Connected as {}", address);

            let stop = shutdown_signal();
            tokio::pin!(stop);
            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    event = events.recv() => match event {
                        Ok(event) => print_json(&json!({
                            "previous": event.previous.as_str(),
                            "current": event.current.as_str(),
                            "address": event.address,
                            "error": event.error.map(|e| e.to_string()),
                        }))?,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            core.shutdown().await;
        }
    }

    Ok(())
}

fn adapter(config: &WalletConfig) -> kale_wallet::actions::ContractActionAdapter {
    kale_wallet::actions::ContractActionAdapter::new(
        config.chain.clone(),
        config.contracts.clone(),
        config.fees.clone(),
    )
}

async fn submit(config: WalletConfig, action: ContractAction) -> Result<(), Box<dyn std::error::Error>> {
    let core = WalletCore::start_from_config(config).await?;
    let outcome = async {
        let address = core.connect().await?;
        eprintln!("Connected as {}", address);
        core.execute(&action).await
    }
    .await;
    core.shutdown().await;

    let result = outcome?;
    print_json(&json!({
        "code": result.code,
        "transaction_hash": result.transaction_hash,
        "height": result.height,
        "raw_log": result.raw_log,
    }))?;
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
