//! Juris CLI - operational surface for the judge agent
//!
//! # Quick Start
//!
//! ```bash
//! # Register as a judge with a 1000-token stake
//! JURIS_IDENTITY=0x... JURIS_RPC_URL=http://localhost:8545 juris register
//!
//! # Run one scan over all markets
//! JURIS_LLM_API_KEY=sk-... juris process
//!
//! # Scan every 60 seconds until interrupted
//! juris loop --interval 60
//! ```
//!
//! Required settings missing at startup abort the process before any scan
//! begins; per-market failures during a scan never do.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use juris_agent::{ensure_registered, run_loop, Engine, RegistrationOutcome, Scanner};
use juris_ledger::{LedgerClient, LedgerConfig, RpcLedgerClient};
use juris_oracle::{oracle_from_env, JudgmentOracle};
use juris_store::{SecretStore, SledSecretStore};
use juris_types::{Address, Outcome};

/// The stake token uses 6 decimals; CLI amounts are whole tokens.
const STAKE_BASE_UNITS: u128 = 1_000_000;

/// Juris - autonomous judge agent for commit-reveal prediction markets
#[derive(Parser)]
#[command(
    name = "juris",
    about = "Autonomous judge agent for commit-reveal prediction-market resolution",
    version,
    propagate_version = true
)]
struct Cli {
    /// Ledger gateway JSON-RPC endpoint
    #[arg(long, global = true, env = "JURIS_RPC_URL", default_value = "http://localhost:8545")]
    rpc_url: String,

    /// Judge identity address (0x-prefixed)
    #[arg(long, global = true, env = "JURIS_IDENTITY")]
    identity: Option<String>,

    /// Bearer token for authenticated gateways
    #[arg(long, global = true, env = "JURIS_RPC_TOKEN")]
    rpc_token: Option<String>,

    /// Path of the durable secret store
    #[arg(long, global = true, env = "JURIS_STORE_PATH", default_value = "juris-secrets.db")]
    store_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register as a judge (approves the stake token first)
    Register {
        /// Stake in whole tokens
        #[arg(long, default_value = "1000")]
        stake: u64,
    },

    /// Show judge status, stake, and balances
    Status,

    /// Run one scan over all markets and act where needed
    Process,

    /// Commit a vote on a single market with an explicit outcome
    Commit {
        #[arg(long)]
        market: u64,
        /// "yes" or "no"
        #[arg(long)]
        outcome: String,
    },

    /// Reveal a previously committed vote on a single market
    Reveal {
        #[arg(long)]
        market: u64,
    },

    /// Join a sub-court
    JoinCourt {
        #[arg(long)]
        court: u64,
    },

    /// Leave a sub-court
    LeaveCourt {
        #[arg(long)]
        court: u64,
    },

    /// Scan repeatedly on an interval until interrupted
    Loop {
        /// Seconds between scans
        #[arg(long, default_value = "60")]
        interval: u64,
    },
}

fn identity(cli: &Cli) -> Result<Address> {
    let raw = cli
        .identity
        .as_deref()
        .context("judge identity not set (pass --identity or set JURIS_IDENTITY)")?;
    raw.parse()
        .with_context(|| format!("invalid judge identity {raw:?}"))
}

fn ledger(cli: &Cli) -> Result<Arc<dyn LedgerClient>> {
    let client = RpcLedgerClient::new(LedgerConfig {
        endpoint: cli.rpc_url.clone(),
        auth_token: cli.rpc_token.clone(),
        ..LedgerConfig::default()
    })?;
    Ok(Arc::new(client))
}

fn open_store(path: &str) -> Result<Arc<dyn SecretStore>> {
    let store = SledSecretStore::open(path)
        .with_context(|| format!("cannot open secret store at {path:?}"))?;
    Ok(Arc::new(store))
}

fn oracle() -> Result<Arc<dyn JudgmentOracle>> {
    Ok(Arc::from(oracle_from_env()?))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let identity = identity(&cli)?;
    let ledger = ledger(&cli)?;
    let store_path = cli.store_path.clone();

    match cli.command {
        Commands::Register { stake } => {
            let amount = u128::from(stake) * STAKE_BASE_UNITS;
            match ensure_registered(ledger.as_ref(), identity, amount).await? {
                RegistrationOutcome::AlreadyActive => {
                    println!("already registered as a judge, nothing to do");
                }
                RegistrationOutcome::Registered { tx_hash } => {
                    println!("registered with {stake} token stake (tx {tx_hash})");
                }
            }
        }

        Commands::Status => {
            let (profile, balance, markets) = tokio::join!(
                ledger.judge(identity),
                ledger.token_balance(identity),
                ledger.market_count(),
            );
            let profile = profile?;
            println!("Address:        {identity}");
            println!("Status:         {}", profile.status);
            println!("Stake:          {} tokens", profile.stake / STAKE_BASE_UNITS);
            println!("Balance:        {} tokens", balance? / STAKE_BASE_UNITS);
            println!("Reputation:     {}/10000", profile.reputation_score);
            println!("Successful:     {}", profile.successful_resolutions);
            println!("Failed:         {}", profile.failed_resolutions);
            println!("Total markets:  {}", markets?);
        }

        Commands::Process => {
            let engine =
                Engine::new(ledger.clone(), open_store(&store_path)?, identity).with_oracle(oracle()?);
            let scanner = Scanner::new(engine, ledger, identity);
            let report = scanner.scan().await?;
            for line in report.lines() {
                println!("{line}");
            }
        }

        Commands::Commit { market, outcome } => {
            let outcome: Outcome = outcome
                .parse()
                .with_context(|| format!("invalid outcome {outcome:?}"))?;
            let engine = Engine::new(ledger, open_store(&store_path)?, identity);
            let action = engine.commit_with_outcome(market, outcome).await?;
            println!("market {market}: {action:?}");
        }

        Commands::Reveal { market } => {
            let engine = Engine::new(ledger, open_store(&store_path)?, identity);
            let action = engine.reveal_market(market).await?;
            println!("market {market}: {action:?}");
        }

        Commands::JoinCourt { court } => {
            let receipt = ledger.join_court(court).await?;
            println!("joined court {court} (tx {})", receipt.tx_hash);
        }

        Commands::LeaveCourt { court } => {
            let receipt = ledger.leave_court(court).await?;
            println!("left court {court} (tx {})", receipt.tx_hash);
        }

        Commands::Loop { interval } => {
            let engine =
                Engine::new(ledger.clone(), open_store(&store_path)?, identity).with_oracle(oracle()?);
            let scanner = Arc::new(Scanner::new(engine, ledger, identity));

            let (tx, rx) = watch::channel(false);
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                let _ = tx.send(true);
            });

            run_loop(scanner, Duration::from_secs(interval), rx).await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stake_conversion() {
        assert_eq!(u128::from(1000u64) * STAKE_BASE_UNITS, 1_000_000_000);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "juris",
            "--identity",
            "0x1111111111111111111111111111111111111111",
            "commit",
            "--market",
            "3",
            "--outcome",
            "yes",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Commit { market: 3, .. }
        ));
        assert!(identity(&cli).is_ok());
    }

    #[test]
    fn test_missing_identity_is_fatal() {
        let cli = Cli::try_parse_from(["juris", "status"]).unwrap();
        assert!(identity(&cli).is_err());
    }
}
