//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::cached_adapter::CachedDataAdapter;
use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::config_validation::validate_run_config;
use crate::domain::engine;
use crate::domain::error::TrendbandError;
use crate::domain::run_config::{RunConfig, StrategyParams};
use crate::domain::stats::{METRIC_NAMES, Stats};
use crate::domain::summary::{StrategyResult, summarize};
use crate::domain::timeseries;
use crate::domain::trade_log::TradeAction;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "trendband", about = "Regime-filtered trend-following backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest for a single symbol
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Backtest every configured symbol and tabulate the results
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Metric to chart across symbols
        #[arg(long, default_value = "annualized_return")]
        chart: String,
    },
    /// Show available data range for configured symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            output,
        } => run_backtest(&config, symbol.as_deref(), output.as_deref()),
        Command::Compare {
            config,
            output,
            chart,
        } => run_compare(&config, output.as_deref(), &chart),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Build the validated per-run configuration for one symbol.
pub fn build_run_config(
    adapter: &dyn ConfigPort,
    symbol: &str,
) -> Result<RunConfig, TrendbandError> {
    let start_date = parse_config_date(adapter, "start_date")?;
    let end_date = parse_config_date(adapter, "end_date")?;

    Ok(RunConfig {
        symbol: symbol.to_string(),
        start_date,
        end_date,
        capital: adapter.get_double("backtest", "capital", 10_000.0),
        use_adjusted: adapter.get_bool("backtest", "use_adjusted", false),
        use_cache: adapter.get_bool("data", "use_cache", true),
        regime_symbol: adapter
            .get_string("strategy", "regime_symbol")
            .unwrap_or_else(|| "GSPC".to_string()),
        regime_fast: adapter.get_int("strategy", "regime_fast", 1) as usize,
        regime_slow: adapter.get_int("strategy", "regime_slow", 200) as usize,
        strategy: StrategyParams {
            sma_period: adapter.get_int("strategy", "sma_period", 200) as usize,
            percent_band: adapter.get_double("strategy", "percent_band", 0.0),
            use_regime_filter: adapter.get_bool("strategy", "use_regime_filter", true),
        },
    })
}

fn parse_config_date(adapter: &dyn ConfigPort, key: &str) -> Result<NaiveDate, TrendbandError> {
    let raw = adapter
        .get_string("backtest", key)
        .ok_or_else(|| TrendbandError::ConfigMissing {
            section: "backtest".into(),
            key: key.into(),
        })?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| TrendbandError::ConfigInvalid {
        section: "backtest".into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

pub fn resolve_symbols(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(s) = symbol_override {
        return vec![s.to_uppercase()];
    }

    if let Some(symbols) = config.get_string("backtest", "symbols") {
        return symbols
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(symbol) = config.get_string("backtest", "symbol") {
        let symbol = symbol.trim().to_uppercase();
        if !symbol.is_empty() {
            return vec![symbol];
        }
    }

    vec![]
}

fn build_data_port(config: &dyn ConfigPort) -> Box<dyn DataPort> {
    let base = PathBuf::from(
        config
            .get_string("data", "path")
            .unwrap_or_else(|| "data".to_string()),
    );
    let csv = CsvDataAdapter::new(base);
    if config.get_bool("data", "use_cache", true) {
        Box::new(CachedDataAdapter::new(csv))
    } else {
        Box::new(csv)
    }
}

/// Full pipeline for one symbol: fetch, prepare, simulate, summarize.
pub fn run_symbol(
    data_port: &dyn DataPort,
    config: &RunConfig,
) -> Result<(engine::BacktestResult, Stats), TrendbandError> {
    let raw = data_port.fetch(&config.symbol)?;
    let series = timeseries::select_period(
        &raw,
        config.start_date,
        config.end_date,
        config.use_adjusted,
    );
    timeseries::validate(&config.symbol, &series)?;

    // The reference stays untrimmed so the regime windows warm up on
    // history before the requested start.
    let reference = data_port.fetch(&config.regime_symbol)?;
    timeseries::validate(&config.regime_symbol, &reference)?;

    let annotated = timeseries::annotate(&series, &reference, config);
    let (signals, effective_start) =
        timeseries::finalize(&config.symbol, &annotated, config.start_date)?;
    log::debug!(
        "{}: {} tradable bars, effective start {}",
        config.symbol,
        signals.len(),
        effective_start
    );

    let result = engine::run(&config.symbol, &signals, config.capital, &config.strategy)?;
    let stats = Stats::compute(
        &result.trade_log,
        result.daily_balance.entries(),
        config.capital,
    );
    Ok((result, stats))
}

fn run_backtest(
    config_path: &Path,
    symbol_override: Option<&str>,
    output_path: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let symbols = resolve_symbols(symbol_override, &adapter);
    let Some(symbol) = symbols.first() else {
        eprintln!("error: no symbol configured");
        return ExitCode::from(2);
    };
    if symbols.len() > 1 {
        log::info!("multiple symbols configured, backtesting {symbol} (use compare for all)");
    }

    let run_cfg = match build_run_config(&adapter, symbol) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = build_data_port(&adapter);

    eprintln!(
        "Running backtest: {} from {} to {}",
        run_cfg.symbol, run_cfg.start_date, run_cfg.end_date
    );
    let (result, stats) = match run_symbol(data_port.as_ref(), &run_cfg) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_trades(&result);
    print_stats(&stats);

    let table = summarize(
        &[StrategyResult {
            symbol: run_cfg.symbol.clone(),
            stats,
        }],
        METRIC_NAMES,
    );
    write_report(&table, None, output_path)
}

fn run_compare(config_path: &Path, output_path: Option<&Path>, chart_metric: &str) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let symbols = resolve_symbols(None, &adapter);
    if symbols.is_empty() {
        eprintln!("error: no symbols configured");
        return ExitCode::from(2);
    }

    let configs: Vec<RunConfig> = {
        let mut out = Vec::with_capacity(symbols.len());
        for symbol in &symbols {
            match build_run_config(&adapter, symbol) {
                Ok(c) => out.push(c),
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            }
        }
        out
    };

    let data_port = build_data_port(&adapter);

    eprintln!("Comparing {} symbols...", configs.len());
    let runs: Vec<Result<StrategyResult, TrendbandError>> = configs
        .par_iter()
        .map(|cfg| {
            run_symbol(data_port.as_ref(), cfg).map(|(_, stats)| StrategyResult {
                symbol: cfg.symbol.clone(),
                stats,
            })
        })
        .collect();

    let mut results = Vec::with_capacity(runs.len());
    for run in runs {
        match run {
            Ok(r) => {
                eprintln!(
                    "  {}: {} trades, {:.2}% total return",
                    r.symbol,
                    r.stats.total_trades(),
                    r.stats.total_return * 100.0
                );
                results.push(r);
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    let table = summarize(&results, METRIC_NAMES);
    write_report(&table, Some(chart_metric), output_path)
}

fn run_info(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbols = resolve_symbols(symbol_override, &adapter);
    if symbols.is_empty() {
        eprintln!("error: no symbols configured");
        return ExitCode::from(2);
    }

    let data_port = build_data_port(&adapter);

    for symbol in &symbols {
        match data_port.data_range(symbol) {
            Ok(Some((first, last, count))) => {
                println!("{symbol}: {count} bars, {first} to {last}");
            }
            Ok(None) => {
                eprintln!("{symbol}: no data found");
            }
            Err(e) => {
                eprintln!("error querying {symbol}: {e}");
            }
        }
    }
    ExitCode::SUCCESS
}

fn print_trades(result: &engine::BacktestResult) {
    let entries = result.trade_log.entries();
    if entries.is_empty() {
        eprintln!("\nNo trades executed");
        return;
    }

    eprintln!("\n=== Trades ===");
    for entry in entries {
        let action = match entry.action {
            TradeAction::Buy => "BUY ",
            TradeAction::Sell => "SELL",
        };
        eprintln!(
            "  {} {} {:>6} @ {:>10.2}  cash {:>12.2}",
            entry.date, action, entry.shares, entry.price, entry.cash_after
        );
    }

    if let Some(last) = result.daily_balance.entries().last() {
        eprintln!("\nFinal equity: {:.2} on {}", last.equity, last.date);
    }
}

fn print_stats(stats: &Stats) {
    eprintln!("\n=== Results ===");
    eprintln!("Total Return:     {:.2}%", stats.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", stats.annualized_return * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", stats.sharpe_ratio);
    eprintln!("Sortino Ratio:    {:.2}", stats.sortino_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", stats.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", stats.total_trades());
    eprintln!("Win Rate:         {:.1}%", stats.win_rate * 100.0);
    eprintln!("Profit Factor:    {:.2}", stats.profit_factor);
    eprintln!("Exposure:         {:.1}%", stats.exposure * 100.0);
}

fn write_report(
    table: &crate::domain::summary::SummaryTable,
    chart_metric: Option<&str>,
    output_path: Option<&Path>,
) -> ExitCode {
    let reporter = TextReportAdapter::new();
    match output_path {
        Some(path) => match reporter.write(table, chart_metric, path) {
            Ok(()) => {
                eprintln!("\nReport written to: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                ExitCode::from(&e)
            }
        },
        None => {
            println!("{}", reporter.render(table, chart_metric));
            ExitCode::SUCCESS
        }
    }
}
