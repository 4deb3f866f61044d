//! CLI definition and dispatch.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvFeedAdapter;
use crate::adapters::csv_bar_store::CsvBarStore;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::journal_order_adapter::JournalOrderAdapter;
use crate::adapters::static_position_adapter::StaticPositionAdapter;
use crate::domain::config_validation::{validate_data_config, validate_strategy_config};
use crate::domain::error::SigtraderError;
use crate::domain::evaluator::{CycleReport, DispatchOutcome, Evaluator, Ports};
use crate::domain::signal::Evaluation;
use crate::domain::strategy::{SizingMode, Strategy, StrategyConfig, StrategyKind};
use crate::domain::sync::{SyncConfig, SyncEngine};
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Daily trade signal evaluator")]
pub struct Cli {
    /// Log level when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sync, evaluate and dispatch one symbol
    Evaluate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        /// Evaluation date (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Derive the signal without submitting an order
        #[arg(long)]
        dry_run: bool,
    },
    /// Bring the cached series for a symbol up to date
    Sync {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the cached data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
    },
}

/// Install the global subscriber. `RUST_LOG` wins over `--log-level`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Evaluate {
            config,
            symbol,
            date,
            dry_run,
        } => run_evaluate(&config, &symbol, date, dry_run),
        Command::Sync {
            config,
            symbol,
            date,
        } => run_sync(&config, &symbol, date),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, &symbol),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Upper-case and check a ticker symbol. Symbols become file names, so only
/// alphanumerics, `.` and `-` are accepted.
pub fn normalize_symbol(raw: &str) -> Result<String, SigtraderError> {
    let symbol = raw.trim().to_uppercase();
    let valid = !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !symbol.starts_with('.');
    if !valid {
        return Err(SigtraderError::ConfigInvalid {
            section: "cli".to_string(),
            key: "symbol".to_string(),
            reason: format!("'{raw}' is not a valid symbol"),
        });
    }
    Ok(symbol)
}

pub fn build_sync_config(adapter: &dyn ConfigPort) -> SyncConfig {
    let defaults = SyncConfig::default();
    SyncConfig {
        lookback_days: adapter.get_int("data", "lookback_days", defaults.lookback_days as i64)
            as u64,
        settlement_lag_days: adapter.get_int(
            "data",
            "settlement_lag_days",
            defaults.settlement_lag_days as i64,
        ) as u64,
        fetch_timeout: Duration::from_secs(adapter.get_int(
            "data",
            "fetch_timeout_secs",
            defaults.fetch_timeout.as_secs() as i64,
        ) as u64),
    }
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<Strategy, SigtraderError> {
    let invalid = |key: &str, reason: String| SigtraderError::ConfigInvalid {
        section: "strategy".to_string(),
        key: key.to_string(),
        reason,
    };

    let kind = match adapter.get_string("strategy", "kind") {
        Some(raw) => raw.parse::<StrategyKind>().map_err(|r| invalid("kind", r))?,
        None => StrategyKind::Threshold,
    };
    let sizing_mode = match adapter.get_string("strategy", "sizing_mode") {
        Some(raw) => raw
            .parse::<SizingMode>()
            .map_err(|r| invalid("sizing_mode", r))?,
        None => SizingMode::Shares,
    };

    let defaults = StrategyConfig::default();
    let config = StrategyConfig {
        buy_threshold: adapter.get_double("strategy", "buy_threshold", defaults.buy_threshold),
        sell_threshold: adapter.get_double("strategy", "sell_threshold", defaults.sell_threshold),
        short_window: adapter.get_int("strategy", "short_window", defaults.short_window as i64)
            as usize,
        long_window: adapter.get_int("strategy", "long_window", defaults.long_window as i64)
            as usize,
        position_size: adapter.get_double("strategy", "position_size", defaults.position_size),
        sizing_mode,
    };
    Ok(Strategy::new(kind, config))
}

/// Concrete adapters for one configured run.
pub struct Runtime {
    pub store: CsvBarStore,
    pub feed: CsvFeedAdapter,
    pub positions: StaticPositionAdapter,
    pub orders: JournalOrderAdapter,
    pub sync_engine: SyncEngine,
    pub strategy: Strategy,
}

impl Runtime {
    pub fn evaluator(&self) -> Evaluator<'_> {
        let ports = Ports {
            store: &self.store,
            data: &self.feed,
            positions: &self.positions,
            orders: &self.orders,
        };
        Evaluator::new(ports, self.sync_engine.clone(), self.strategy.clone())
    }
}

/// Validate the whole config and construct every adapter from it.
pub fn build_runtime(adapter: &dyn ConfigPort) -> Result<Runtime, SigtraderError> {
    validate_data_config(adapter)?;
    validate_strategy_config(adapter)?;

    let cache_dir = adapter
        .get_string("data", "cache_dir")
        .ok_or_else(|| SigtraderError::ConfigMissing {
            section: "data".to_string(),
            key: "cache_dir".to_string(),
        })?;
    let feed_dir = adapter
        .get_string("data", "feed_dir")
        .unwrap_or_else(|| "feed".to_string());
    let journal = adapter
        .get_string("orders", "journal_path")
        .unwrap_or_else(|| "orders.csv".to_string());

    Ok(Runtime {
        store: CsvBarStore::new(cache_dir),
        feed: CsvFeedAdapter::new(PathBuf::from(feed_dir)),
        positions: StaticPositionAdapter::from_config(adapter),
        orders: JournalOrderAdapter::new(journal),
        sync_engine: SyncEngine::new(build_sync_config(adapter)),
        strategy: build_strategy(adapter)?,
    })
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn prepare(config_path: &PathBuf, raw_symbol: &str) -> Result<(Runtime, String), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    let report = |e: SigtraderError| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    };
    let symbol = normalize_symbol(raw_symbol).map_err(report)?;
    let runtime = build_runtime(&adapter).map_err(report)?;
    Ok((runtime, symbol))
}

pub fn print_cycle_report(report: &CycleReport) {
    eprintln!("\n=== {} ===", report.symbol);
    eprintln!("Sync:         {}", report.sync);
    match (report.bars, report.latest_date) {
        (0, _) | (_, None) => eprintln!("Bars:         none cached"),
        (n, Some(last)) => eprintln!("Bars:         {n} (latest {last})"),
    }
    eprintln!("Position:     {}", if report.has_position { "held" } else { "flat" });
    match &report.evaluation {
        Evaluation::Signal(signal) => {
            eprintln!("Signal:       {signal}");
            println!("{signal}");
        }
        Evaluation::Insufficient { bars, required } => {
            eprintln!("Signal:       none (insufficient history: {bars} of {required} bars)");
        }
    }
    let dispatch = match &report.dispatch {
        DispatchOutcome::Submitted => "submitted".to_string(),
        DispatchOutcome::NotRequired => "no order".to_string(),
        DispatchOutcome::DryRun => "dry run, not submitted".to_string(),
        DispatchOutcome::Failed { reason } => format!("FAILED: {reason}"),
    };
    eprintln!("Dispatch:     {dispatch}");
}

fn run_evaluate(
    config_path: &PathBuf,
    raw_symbol: &str,
    date: Option<NaiveDate>,
    dry_run: bool,
) -> ExitCode {
    let (runtime, symbol) = match prepare(config_path, raw_symbol) {
        Ok(r) => r,
        Err(code) => return code,
    };
    eprintln!("Strategy: {}", runtime.strategy.kind());

    let evaluator = runtime.evaluator().dry_run(dry_run);
    let report = match evaluator.evaluate(&symbol, date.unwrap_or_else(today)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_cycle_report(&report);
    match report.dispatch {
        DispatchOutcome::Failed { reason } => {
            let err = SigtraderError::Dispatch { symbol, reason };
            ExitCode::from(&err)
        }
        _ => ExitCode::SUCCESS,
    }
}

fn run_sync(config_path: &PathBuf, raw_symbol: &str, date: Option<NaiveDate>) -> ExitCode {
    let (runtime, symbol) = match prepare(config_path, raw_symbol) {
        Ok(r) => r,
        Err(code) => return code,
    };

    match runtime
        .evaluator()
        .sync_symbol(&symbol, date.unwrap_or_else(today))
    {
        Ok(report) => {
            eprintln!("{}: {}", symbol, report.status);
            match (report.series.first_date(), report.series.latest_date()) {
                (Some(first), Some(last)) => {
                    eprintln!("  {} bars from {} to {}", report.series.len(), first, last)
                }
                _ => eprintln!("  no bars cached"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let runtime = match build_runtime(&adapter) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let sync = runtime.sync_engine.config();
    let strategy = runtime.strategy.config();
    eprintln!("\nData:");
    eprintln!("  cache_dir:           {}", runtime.store.base_path().display());
    eprintln!("  lookback_days:       {}", sync.lookback_days);
    eprintln!("  settlement_lag_days: {}", sync.settlement_lag_days);
    eprintln!("  fetch_timeout:       {}s", sync.fetch_timeout.as_secs());
    eprintln!("\nStrategy ({}):", runtime.strategy.kind());
    match runtime.strategy.kind() {
        StrategyKind::Threshold => {
            eprintln!("  buy below:  {:+.2}%", strategy.buy_threshold * 100.0);
            eprintln!("  sell above: {:+.2}%", strategy.sell_threshold * 100.0);
        }
        StrategyKind::Crossover => {
            eprintln!(
                "  SMA({}) vs SMA({})",
                strategy.short_window, strategy.long_window
            );
        }
    }
    eprintln!(
        "  size:       {} {}",
        strategy.position_size, strategy.sizing_mode
    );

    eprintln!("\nConfiguration is valid");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, raw_symbol: &str) -> ExitCode {
    let (runtime, symbol) = match prepare(config_path, raw_symbol) {
        Ok(r) => r,
        Err(code) => return code,
    };

    if let Some(lock) = runtime.store.held_lock(&symbol) {
        eprintln!(
            "warning: {} exists; persists for {symbol} fail until it is removed",
            lock.display()
        );
    }

    match runtime.store.data_range(&symbol) {
        Ok(Some((first, last, count))) => {
            println!("{symbol}: {count} bars from {first} to {last}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("{symbol}: no cached bars");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
