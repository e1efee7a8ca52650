//! # bgw-runner
//!
//! Command-line entry point for the Bybit gateway.
//!
//! Loads a JSON configuration file (falling back to defaults), applies the
//! `BYBIT_API_KEY` / `BYBIT_API_SECRET` overrides, builds one
//! [`BybitClient`], runs a single command, and prints the response envelope.
//!
//! # Usage
//!
//! ```bash
//! bgw-runner --config config.json tickers --category spot --symbol BTCUSDT
//! bgw-runner wallet --account-type UNIFIED
//! bgw-runner call --method GET --endpoint market/time
//! bgw-runner call --method POST --endpoint order/cancel --auth \
//!     --param category=linear --param symbol=BTCUSDT --param orderId=123
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use bgw_core::config::{AppConfig, load_config};
use bgw_core::logging::{TracingLogger, init_logging};
use bgw_rest::{BybitClient, Envelope, GatewayError, Method, ParamSet};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

/// Bybit V5 REST gateway runner.
#[derive(Parser)]
#[command(name = "bgw-runner", about = "Bybit V5 REST gateway runner")]
struct Cli {
    /// Configuration file path (JSON).
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error). Overrides `logger.level`.
    #[arg(short, long)]
    log_level: Option<String>,

    /// Optional log directory for file output. Overrides `logger.output`.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Latest ticker snapshot.
    Tickers {
        #[arg(long, default_value = "spot")]
        category: String,
        #[arg(long, default_value = "")]
        symbol: String,
    },
    /// Candles for one symbol.
    Kline {
        #[arg(long, default_value = "spot")]
        category: String,
        #[arg(long)]
        symbol: String,
        /// `1`, `5`, `60`, `D`, `W`, ...
        #[arg(long, default_value = "1")]
        interval: String,
        #[arg(long, default_value_t = 0)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        start: i64,
        #[arg(long, default_value_t = 0)]
        end: i64,
    },
    /// Order book depth.
    Orderbook {
        #[arg(long, default_value = "spot")]
        category: String,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value_t = 0)]
        limit: u32,
    },
    /// Wallet balance (signed).
    Wallet {
        #[arg(long, default_value = "UNIFIED")]
        account_type: String,
        #[arg(long, default_value = "")]
        coin: String,
    },
    /// Open positions (signed).
    Positions {
        #[arg(long, default_value = "linear")]
        category: String,
        #[arg(long, default_value = "")]
        symbol: String,
        #[arg(long, default_value = "")]
        settle_coin: String,
    },
    /// Open orders (signed).
    Orders {
        #[arg(long, default_value = "linear")]
        category: String,
        #[arg(long, default_value = "")]
        symbol: String,
        #[arg(long, default_value_t = 0)]
        limit: u32,
    },
    /// Any V5 endpoint with raw string parameters.
    Call {
        #[arg(long, default_value = "GET")]
        method: String,
        /// Path below `/v5/`, e.g. `market/time`.
        #[arg(long)]
        endpoint: String,
        /// Sign the request.
        #[arg(long)]
        auth: bool,
        /// `key=value`, repeatable.
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration; a missing or broken file falls back to defaults
    let (mut config, load_err) = match load_config(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    config.apply_env_overrides();

    // 2. Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(&config.logger.level);
    let log_dir = cli.log_dir.as_deref().or(config.logger.log_dir());
    init_logging(level, log_dir, "bgw-runner");

    if let Some(e) = load_err {
        warn!("config {} not loaded ({e}), using defaults", cli.config.display());
    }
    config.validate().context("invalid configuration")?;
    info!("bgw-runner starting: {:?}", config.bybit);

    // 3. Build the client
    let client = BybitClient::new(&config.bybit, TracingLogger::shared())?;
    if !config.bybit.has_credentials() {
        warn!("no API credentials configured, signed endpoints will be rejected");
    }

    // 4. Run the command
    match run(&client, cli.command).await {
        Ok(envelope) => {
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
        Err(e) => {
            error!("request failed: kind={} code={} {e}", e.kind(), e.kind().code());
            Err(e.into())
        }
    }
}

async fn run(client: &BybitClient, command: Command) -> Result<Envelope, GatewayError> {
    match command {
        Command::Tickers { category, symbol } => {
            client.market.get_tickers(&category, &symbol).await
        }
        Command::Kline {
            category,
            symbol,
            interval,
            limit,
            start,
            end,
        } => {
            client
                .market
                .get_kline(&category, &symbol, &interval, limit, start, end)
                .await
        }
        Command::Orderbook {
            category,
            symbol,
            limit,
        } => client.market.get_orderbook(&category, &symbol, limit).await,
        Command::Wallet { account_type, coin } => {
            client.account.get_wallet_balance(&account_type, &coin).await
        }
        Command::Positions {
            category,
            symbol,
            settle_coin,
        } => {
            client
                .position
                .get_positions(&category, &symbol, &settle_coin)
                .await
        }
        Command::Orders {
            category,
            symbol,
            limit,
        } => {
            client
                .order
                .get_open_orders(&category, &symbol, "", "", limit)
                .await
        }
        Command::Call {
            method,
            endpoint,
            auth,
            params,
        } => {
            let method: Method = method.parse()?;
            let params: ParamSet = params.into_iter().collect();
            client.gateway().execute(method, &endpoint, params, auth).await
        }
    }
}
