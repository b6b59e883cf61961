//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, DEFAULT_TRANSACTION_COST};
use crate::domain::config_validation::validate_backtest_config;
use crate::domain::error::BacktestError;
use crate::logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "ma-backtest", about = "Moving-average crossover backtester")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and print the report
    Backtest {
        #[command(flatten)]
        params: ParamArgs,
        /// Write the date-indexed curves to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Validate the configuration and stop
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration without fetching data
    Validate {
        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Backtest parameters. Each flag overrides the matching INI key.
#[derive(Args, Debug, Default, Clone)]
pub struct ParamArgs {
    /// INI file with [backtest] and [data] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Ticker symbol, e.g. AAPL or TCS.NS
    #[arg(long)]
    pub ticker: Option<String>,
    /// Amount invested at the first date
    #[arg(long)]
    pub investment: Option<String>,
    /// Fast moving-average period
    #[arg(long)]
    pub fast: Option<String>,
    /// Slow moving-average period
    #[arg(long)]
    pub slow: Option<String>,
    /// First date, YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// Last date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub end: Option<String>,
    /// Cost per position change as a fraction of notional
    #[arg(long)]
    pub cost: Option<String>,
    /// Directory holding <TICKER>.csv price files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

/// Command-line flags layered over a config file.
pub struct LayeredConfig<'a> {
    flags: Vec<(&'static str, &'static str, String)>,
    base: &'a dyn ConfigPort,
}

impl<'a> LayeredConfig<'a> {
    pub fn new(params: &ParamArgs, base: &'a dyn ConfigPort) -> Self {
        let mut flags = Vec::new();
        let entries = [
            ("backtest", "ticker", params.ticker.clone()),
            ("backtest", "investment_amount", params.investment.clone()),
            ("backtest", "fast_period", params.fast.clone()),
            ("backtest", "slow_period", params.slow.clone()),
            ("backtest", "start_date", params.start.clone()),
            ("backtest", "end_date", params.end.clone()),
            ("backtest", "transaction_cost", params.cost.clone()),
            (
                "data",
                "dir",
                params.data_dir.as_ref().map(|p| p.display().to_string()),
            ),
        ];
        for (section, key, value) in entries {
            if let Some(v) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                flags.push((section, key, v));
            }
        }
        Self { flags, base }
    }
}

impl ConfigPort for LayeredConfig<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.flags
            .iter()
            .find(|(s, k, _)| *s == section && *k == key)
            .map(|(_, _, v)| v.clone())
            .or_else(|| self.base.get_string(section, key))
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let logging_ready = match logging::init_logging(&cli.log_level) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("warning: {e}");
            false
        }
    };

    let outcome = match cli.command {
        Command::Backtest {
            params,
            output,
            dry_run,
        } => run_backtest(&params, output.as_deref(), dry_run),
        Command::Validate { params } => run_validate(&params),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if logging_ready {
                tracing::error!("{e}");
            } else {
                eprintln!("error: {e}");
            }
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, BacktestError> {
    match path {
        Some(path) => {
            tracing::info!("loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map_err(|e| BacktestError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn require<T: FromStr>(config: &dyn ConfigPort, section: &str, key: &str, expected: &str) -> Result<T, BacktestError> {
    let raw = config
        .get_string(section, key)
        .ok_or_else(|| BacktestError::missing(section, key))?;
    raw.parse()
        .map_err(|_| BacktestError::invalid(section, key, format!("expected {expected}, got '{raw}'")))
}

fn parse_date(section: &str, key: &str, raw: &str) -> Result<NaiveDate, BacktestError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| BacktestError::invalid(section, key, "invalid date format (expected YYYY-MM-DD)"))
}

/// Assemble the immutable run configuration. `today` is the end date when
/// none is configured.
pub fn build_backtest_config(config: &dyn ConfigPort, today: NaiveDate) -> Result<BacktestConfig, BacktestError> {
    let ticker = config
        .get_string("backtest", "ticker")
        .map(|t| t.to_uppercase())
        .ok_or_else(|| BacktestError::missing("backtest", "ticker"))?;

    let investment_amount = require(config, "backtest", "investment_amount", "a number")?;
    let fast_period = require(config, "backtest", "fast_period", "a positive integer")?;
    let slow_period = require(config, "backtest", "slow_period", "a positive integer")?;

    let start_raw = config
        .get_string("backtest", "start_date")
        .ok_or_else(|| BacktestError::missing("backtest", "start_date"))?;
    let start_date = parse_date("backtest", "start_date", &start_raw)?;

    let end_date = match config.get_string("backtest", "end_date") {
        Some(raw) => parse_date("backtest", "end_date", &raw)?,
        None => today,
    };

    let transaction_cost = match config.get_string("backtest", "transaction_cost") {
        Some(_) => require(config, "backtest", "transaction_cost", "a number")?,
        None => DEFAULT_TRANSACTION_COST,
    };

    Ok(BacktestConfig {
        ticker,
        investment_amount,
        fast_period,
        slow_period,
        start_date,
        end_date,
        transaction_cost,
    })
}

pub fn resolve_data_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("data", "dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn resolve_config(params: &ParamArgs) -> Result<(BacktestConfig, PathBuf), BacktestError> {
    let file = load_config(params.config.as_deref())?;
    let layered = LayeredConfig::new(params, &file);

    let config = build_backtest_config(&layered, today())?;
    validate_backtest_config(&config)?;
    Ok((config, resolve_data_dir(&layered)))
}

fn describe(config: &BacktestConfig, data_dir: &Path) -> String {
    format!(
        "ticker:           {}\n\
         investment:       {}\n\
         fast/slow period: {}/{}\n\
         date range:       {} to {}\n\
         transaction cost: {}\n\
         data directory:   {}",
        config.ticker,
        config.investment_amount,
        config.fast_period,
        config.slow_period,
        config.start_date,
        config.end_date,
        config.transaction_cost,
        data_dir.display()
    )
}

fn run_validate(params: &ParamArgs) -> Result<(), BacktestError> {
    let (config, data_dir) = resolve_config(params)?;
    println!("{}", describe(&config, &data_dir));
    println!("\nConfiguration is valid.");
    Ok(())
}

fn run_backtest(params: &ParamArgs, output: Option<&Path>, dry_run: bool) -> Result<(), BacktestError> {
    let (config, data_dir) = resolve_config(params)?;

    if dry_run {
        println!("{}", describe(&config, &data_dir));
        println!("\nDry run complete: configuration is valid");
        return Ok(());
    }

    let data_port = CsvAdapter::new(data_dir);
    let report = run_backtest_pipeline(&data_port, &config, output)?;
    print!("{report}");
    Ok(())
}

/// Fetch, backtest, optionally export curves, and return the rendered
/// text report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
    output: Option<&Path>,
) -> Result<String, BacktestError> {
    let result = backtest_engine::run_with_provider(data_port, config)?;

    if let Some(path) = output {
        CsvReportAdapter::new().write(&result, path)?;
    }

    Ok(text_report::render_summary(result.ticker(), &result.metrics))
}
