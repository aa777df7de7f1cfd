//! atm-cli — Terminal front end for the ATM wallet-contract bridge.
//!
//! Runs the ATM page interactively, or performs a single balance read,
//! deposit, or withdrawal and exits.

use std::io::Write;
use std::sync::Arc;

use alloy_primitives::Address;
use anyhow::{Context, Result, bail};
use atm_bridge::{Bridge, BridgeConfig, DevChain, DevChainOptions, view};
use atm_core::constants::INSTALL_PROMPT;
use atm_core::traits::WalletProvider;
use atm_core::types::TxKind;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// ATM page for the Assessment balance contract.
#[derive(Parser)]
#[command(name = "atm-cli")]
#[command(version, about = "Deposit to and withdraw from the Assessment contract")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Wallet JSON-RPC endpoint (default: $ATM_RPC_ENDPOINT or http://127.0.0.1:8545).
    #[arg(long, global = true)]
    rpc_endpoint: Option<String>,

    /// Contract address (default: $ATM_CONTRACT_ADDRESS or the local deployment).
    #[arg(long, global = true)]
    contract: Option<String>,

    /// Use an in-process development chain instead of an RPC endpoint.
    #[arg(long, global = true)]
    devnet: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json").
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive page (default).
    App,
    /// Print the contract balance.
    Balance,
    /// Deposit into the contract.
    Deposit(AmountArgs),
    /// Withdraw from the contract.
    Withdraw(AmountArgs),
}

#[derive(Args)]
struct AmountArgs {
    /// Amount in contract units (default: $ATM_DEFAULT_AMOUNT or 10).
    #[arg(short, long)]
    amount: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.global.log_level, &cli.global.log_format);

    let config = resolve_config(&cli.global)?;
    info!(
        rpc = %config.rpc_endpoint,
        contract = %config.contract_address,
        devnet = cli.global.devnet,
        "Starting atm-cli"
    );

    let mut bridge = Bridge::new(config);
    let provider = discover(&cli.global, bridge.config()).await;
    bridge.discover_wallet(provider).await;

    match cli.command.unwrap_or(Commands::App) {
        Commands::App => run_app(&mut bridge).await,
        Commands::Balance => show_balance(&mut bridge).await,
        Commands::Deposit(args) => run_operation(&mut bridge, TxKind::Deposit, args).await,
        Commands::Withdraw(args) => run_operation(&mut bridge, TxKind::Withdraw, args).await,
    }
}

/// Environment configuration with command-line overrides applied.
fn resolve_config(global: &GlobalArgs) -> Result<BridgeConfig> {
    let mut config = BridgeConfig::from_env().context("Failed to load configuration")?;
    if let Some(endpoint) = &global.rpc_endpoint {
        config.rpc_endpoint = endpoint.clone();
    }
    if let Some(contract) = &global.contract {
        config.contract_address = contract
            .parse::<Address>()
            .with_context(|| format!("Invalid contract address: {contract}"))?;
    }
    Ok(config)
}

async fn discover(global: &GlobalArgs, config: &BridgeConfig) -> Option<Arc<dyn WalletProvider>> {
    if global.devnet {
        return Some(Arc::new(DevChain::new(DevChainOptions::default())));
    }
    atm_bridge::http::detect(&config.rpc_endpoint).await
}

/// Connect for a one-shot command, failing where the page would prompt.
async fn connect_or_bail(bridge: &mut Bridge) -> Result<()> {
    if bridge.session().wallet().is_none() {
        bail!("{INSTALL_PROMPT}");
    }
    if !bridge.session().is_connected() && !bridge.connect().await.context("Wallet connection failed")? {
        bail!("No account found");
    }
    Ok(())
}

async fn show_balance(bridge: &mut Bridge) -> Result<()> {
    connect_or_bail(bridge).await?;
    let balance = bridge
        .read_balance()
        .await
        .context("getBalance failed")?
        .context("contract not bound")?;
    println!("{balance}");
    Ok(())
}

async fn run_operation(bridge: &mut Bridge, kind: TxKind, args: AmountArgs) -> Result<()> {
    connect_or_bail(bridge).await?;
    if let Some(amount) = args.amount {
        bridge.ui_mut().set_amount(amount);
    }
    let record = bridge
        .submit_input(kind)
        .await
        .with_context(|| format!("{} failed", kind.function_name()))?
        .context("contract not bound")?;

    println!("\n=== {} CONFIRMED ===", kind.to_string().to_uppercase());
    println!("Amount: {}", record.amount);
    println!("TxHash: {}", alloy_primitives::hex::encode_prefixed(record.hash));
    if let Some(balance) = bridge.balance() {
        println!("Balance: {balance}");
    }
    Ok(())
}

/// A command typed at the page prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PageCommand {
    Connect,
    Amount(String),
    Deposit,
    Withdraw,
    History(Option<String>),
    Theme,
    Refresh,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<PageCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next().map(str::to_string);
    let command = match word.to_lowercase().as_str() {
        "connect" => PageCommand::Connect,
        "amount" => PageCommand::Amount(arg.ok_or("usage: amount <N>")?),
        "deposit" => PageCommand::Deposit,
        "withdraw" => PageCommand::Withdraw,
        "history" => PageCommand::History(arg),
        "theme" => PageCommand::Theme,
        "refresh" => PageCommand::Refresh,
        "help" | "?" => PageCommand::Help,
        "quit" | "exit" | "q" => PageCommand::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(Some(command))
}

const HELP: &str = "\
commands:
  connect          connect your wallet
  amount <N>       set the amount for deposit / withdraw
  deposit          deposit the amount
  withdraw         withdraw the amount
  history [PASS]   view transaction history (password prompt if omitted)
  theme            switch theme
  refresh          re-read the balance
  quit             leave";

/// Interactive page loop.
async fn run_app(bridge: &mut Bridge) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if let Err(e) = bridge.refresh_if_stale().await {
            eprintln!("error: {e}");
        }
        print!("{}", view::themed(bridge.ui().theme(), &view::render(bridge)));
        for alert in bridge.take_alerts() {
            println!("! {alert}");
        }
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };
        debug!(?command, "page command");

        let outcome = match command {
            PageCommand::Quit => break,
            PageCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
            PageCommand::Connect => bridge.connect().await.map(|_| ()),
            PageCommand::Amount(amount) => {
                bridge.ui_mut().set_amount(amount);
                Ok(())
            }
            PageCommand::Deposit => bridge.submit_input(TxKind::Deposit).await.map(|_| ()),
            PageCommand::Withdraw => bridge.submit_input(TxKind::Withdraw).await.map(|_| ()),
            PageCommand::History(password) => {
                let password = match password {
                    Some(p) => p,
                    None => prompt_password("Password")?,
                };
                bridge.gate_history(&password);
                Ok(())
            }
            PageCommand::Theme => {
                bridge.toggle_theme();
                Ok(())
            }
            PageCommand::Refresh => bridge.read_balance().await.map(|_| ()),
        };
        if let Err(e) = outcome {
            eprintln!("error: {e}");
        }
    }
    Ok(())
}

/// Prompt for a password securely (no echo).
fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(format!("{prompt}: ")).context("Failed to read password")
}

/// Initialize tracing on stderr so the page on stdout stays clean.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
