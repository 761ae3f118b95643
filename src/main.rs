use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use curvepad::{
    arguments,
    config::{self, with_config},
    contract::{ContractGateway, RpcContractGateway},
    logger::{self, LogTag},
    notifications::{LogSink, NotificationSink},
    registry::{RegistrySync, SyncOutcome, TokenRecord},
    rpc::RpcClient,
    trading::{DeskOptions, LaunchForm, SelectedToken, TradeDesk},
    utils::{format_number, shorten_address},
    wallet::{find_network, WalletSession},
};

/// Launch and trade bonding-curve tokens
///
/// Logger flags (`--debug-<module>`, `--verbose-<module>`) are accepted anywhere
/// on the command line.
#[derive(Parser, Debug)]
#[command(name = "curvepad", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = config::CONFIG_FILE_PATH)]
    config: String,

    /// Show verbose logs for every module
    #[arg(long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wallet, network and account state
    Status,
    /// Ask the wallet for an account
    Connect,
    /// Switch the wallet to a supported network
    SwitchNetwork {
        /// monad-testnet or sepolia (defaults to the configured network)
        network: Option<String>,
    },
    /// List every token launched through the registry
    Tokens {
        /// Only tokens created by the connected account
        #[arg(long)]
        mine: bool,
    },
    /// Show a token's details and your balance of it
    Select { address: String },
    /// Spot estimate for buying or selling an amount of a token
    Estimate { address: String, amount: String },
    /// Approve the registry to spend the asset token
    Approve,
    /// Launch a new token with an initial purchase
    Launch {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        description: String,
        /// Asset tokens spent on the initial purchase
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        image: String,
        #[arg(long, default_value = "")]
        website: String,
        #[arg(long, default_value = "")]
        twitter: String,
        #[arg(long, default_value = "")]
        github: String,
        #[arg(long, default_value = "")]
        discord: String,
    },
    /// Buy a token with the asset token
    Buy { address: String, amount: String },
    /// Sell a token for the asset token
    Sell { address: String, amount: String },
}

/// Wired components shared by every command
struct App {
    session: Arc<WalletSession>,
    registry: Arc<RegistrySync>,
    desk: TradeDesk,
}

#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = std::env::args().collect();
    arguments::set_cmd_args(raw_args.clone());
    let cli = Cli::parse_from(arguments::command_args(&raw_args));

    logger::init();
    logger::debug(
        LogTag::System,
        &format!(
            "Debug modes: {:?} (verbose: {}, quiet: {})",
            arguments::get_enabled_debug_modes(),
            cli.verbose,
            cli.quiet
        ),
    );

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            logger::error(LogTag::System, &format!("{:#}", e));
            1
        }
    };

    logger::flush();
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    config::load_config_from_path(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    with_config(|cfg| cfg.validate()).context("Invalid configuration")?;

    let app = build_app()?;

    if !matches!(cli.command, Command::Connect) {
        if let Err(e) = app.session.restore().await {
            logger::warning(
                LogTag::Wallet,
                &format!("Could not restore wallet session: {}", e),
            );
        }
    }

    match cli.command {
        Command::Status => status(&app).await,
        Command::Connect => {
            app.session.connect().await?;
            print_session(&app.session);
            Ok(())
        }
        Command::SwitchNetwork { network } => {
            let key = network
                .unwrap_or_else(|| with_config(|cfg| cfg.network.preferred_network.clone()));
            let spec = find_network(&key).ok_or_else(|| anyhow!("Unknown network '{}'", key))?;
            app.session.switch_network(&spec).await?;
            print_session(&app.session);
            Ok(())
        }
        Command::Tokens { mine } => tokens(&app, mine).await,
        Command::Select { address } => {
            let selected = app.desk.select_token(parse_address(&address)?).await?;
            print_selected(&selected);
            Ok(())
        }
        Command::Estimate { address, amount } => estimate(&app, &address, &amount).await,
        Command::Approve => {
            app.desk.approve_asset_token().await?;
            Ok(())
        }
        Command::Launch {
            name,
            symbol,
            description,
            amount,
            image,
            website,
            twitter,
            github,
            discord,
        } => {
            let mut form = LaunchForm {
                name,
                symbol,
                description,
                image_url: image,
                website,
                twitter,
                github,
                discord,
                purchase_amount: amount,
            };
            let confirmation = app.desk.launch_token(&mut form).await?;
            println!("Launch confirmed in transaction {}", confirmation.hash);
            Ok(())
        }
        Command::Buy { address, amount } => {
            stage_trade(&app, &address, &amount).await?;
            let confirmation = app.desk.buy().await?;
            println!("Purchase confirmed in transaction {}", confirmation.hash);
            if let Some(selected) = app.desk.selected() {
                print_selected(&selected);
            }
            Ok(())
        }
        Command::Sell { address, amount } => {
            stage_trade(&app, &address, &amount).await?;
            let confirmation = app.desk.sell().await?;
            println!("Sale confirmed in transaction {}", confirmation.hash);
            if let Some(selected) = app.desk.selected() {
                print_selected(&selected);
            }
            Ok(())
        }
    }
}

fn build_app() -> Result<App> {
    let (url, timeout_secs) = with_config(|cfg| {
        (
            cfg.network.wallet_rpc_url.clone(),
            cfg.network.request_timeout_secs,
        )
    });
    let client = Arc::new(
        RpcClient::new(&url, Duration::from_secs(timeout_secs))
            .with_context(|| format!("Failed to create RPC client for {}", url))?,
    );

    let sink: Arc<dyn NotificationSink> = Arc::new(LogSink);
    let session = Arc::new(WalletSession::from_config(client.clone(), sink.clone()));
    let gateway: Arc<dyn ContractGateway> =
        Arc::new(RpcContractGateway::from_config(client, session.clone())?);
    let registry = Arc::new(RegistrySync::from_config(gateway.clone(), session.clone()));
    let desk = TradeDesk::new(
        gateway,
        session.clone(),
        registry.clone(),
        sink,
        DeskOptions::from_config()?,
    );

    Ok(App {
        session,
        registry,
        desk,
    })
}

fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim()).map_err(|e| anyhow!("Invalid address '{}': {}", value, e))
}

async fn stage_trade(app: &App, address: &str, amount: &str) -> Result<()> {
    app.desk.select_token(parse_address(address)?).await?;
    app.desk.set_trade_amount(amount);
    Ok(())
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn status(app: &App) -> Result<()> {
    print_session(&app.session);
    if !app.session.is_connected() {
        return Ok(());
    }

    let state = app.desk.account_state().await?;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Creation fee", "Asset balance", "Asset approved"]);
    table.add_row(vec![
        format_number(&state.fee_display()),
        format_number(&state.balance_display()),
        if state.asset_approved { "yes" } else { "no" }.to_string(),
    ]);
    println!("{table}");
    Ok(())
}

async fn tokens(app: &App, mine: bool) -> Result<()> {
    match app.desk.sync_catalog().await? {
        SyncOutcome::Applied(report) => {
            logger::info(
                LogTag::Registry,
                &format!(
                    "Scanned {} windows up to block {}: {} launches, {} listed",
                    report.windows_scanned,
                    report.head_block,
                    report.events_found,
                    report.catalog_size
                ),
            );
            for skipped in &report.skipped_windows {
                logger::warning(
                    LogTag::Registry,
                    &format!(
                        "Blocks {}-{} were skipped: {}",
                        skipped.window.from_block, skipped.window.to_block, skipped.reason
                    ),
                );
            }
        }
        SyncOutcome::Discarded => {
            return Err(anyhow!("Wallet session changed during sync, run the command again"));
        }
    }

    let records = if mine {
        if !app.session.is_connected() {
            return Err(anyhow!("Connect a wallet to list your tokens"));
        }
        app.registry.my_tokens()
    } else {
        app.registry.catalog().into_records()
    };

    if records.is_empty() {
        println!("No tokens found");
        return Ok(());
    }
    print_tokens(&records);
    Ok(())
}

async fn estimate(app: &App, address: &str, amount: &str) -> Result<()> {
    stage_trade(app, address, amount).await?;
    match app.desk.estimate().await? {
        Some(estimate) => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["Amount", "Unit price", "Buy receives", "Sell receives"]);
            table.add_row(vec![
                format_number(&estimate.amount.to_string()),
                format!("{:.10}", estimate.unit_price),
                format_number(&format!("{:.4}", estimate.buy_out)),
                format_number(&format!("{:.4}", estimate.sell_out)),
            ]);
            println!("{table}");
            println!("{}", "Spot-price estimate; fees and slippage not included".dimmed());
        }
        None => println!("Estimate unavailable for amount '{}'", amount),
    }
    Ok(())
}

// =============================================================================
// RENDERING
// =============================================================================

fn print_session(session: &WalletSession) {
    let state = session.state();
    let account = state
        .account
        .map(|a| a.to_string())
        .unwrap_or_default();

    if !state.is_connected {
        println!("Wallet: {}", "not connected".red());
        return;
    }

    println!("Wallet:  {} {}", "connected".green(), shorten_address(&account));
    let network = match (state.chain_id, session.network_name()) {
        (Some(_), Some(name)) if session.is_supported_network() => name.green(),
        (Some(id), _) => format!("unsupported chain {}", id).yellow(),
        (None, _) => "unknown".yellow(),
    };
    println!("Network: {}", network);
}

fn format_price(record: &TokenRecord) -> String {
    record
        .unit_price
        .map(|p| format!("{:.10}", p))
        .unwrap_or_else(|| "n/a".to_string())
}

fn print_tokens(records: &[TokenRecord]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Name",
        "Symbol",
        "Address",
        "Creator",
        "Unit price",
        "Market cap",
        "24h volume",
        "Trading",
    ]);

    for record in records {
        table.add_row(vec![
            record.name.clone(),
            record.symbol.clone(),
            shorten_address(&record.address.to_string()),
            shorten_address(&record.creator.to_string()),
            format_price(record),
            format_number(&format!("{:.2}", record.market_cap)),
            format_number(&format!("{:.2}", record.volume_24h)),
            if record.trading { "yes" } else { "no" }.to_string(),
        ]);
    }

    println!("{table}");
}

fn print_selected(selected: &SelectedToken) {
    let record = &selected.record;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Token".to_string(), format!("{} ({})", record.name, record.symbol)]);
    table.add_row(vec!["Address".to_string(), record.address.to_string()]);
    table.add_row(vec!["Creator".to_string(), record.creator.to_string()]);
    table.add_row(vec!["Unit price".to_string(), format_price(record)]);
    table.add_row(vec![
        "Market cap".to_string(),
        format_number(&format!("{:.2}", record.market_cap)),
    ]);
    table.add_row(vec![
        "24h volume".to_string(),
        format_number(&format!("{:.2}", record.volume_24h)),
    ]);
    table.add_row(vec![
        "Your balance".to_string(),
        format_number(&selected.balance_display()),
    ]);
    if !selected.description.is_empty() {
        table.add_row(vec!["Description".to_string(), selected.description.clone()]);
    }
    println!("{table}");
}
