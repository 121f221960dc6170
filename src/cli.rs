//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::demo_data_adapter::DemoDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestResult, SimulationConfig};
use crate::domain::config_validation::{validate_data_config, validate_simulation_config};
use crate::domain::engine::{self, EngineConfig};
use crate::domain::error::DiptraderError;
use crate::domain::price_series::PriceSeries;
use crate::domain::selector::{self, SelectorConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "diptrader", about = "Weekly dip-buying strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over CSV price data
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write an SVG chart of portfolio value and drawdown
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Comma-separated symbol list, overriding the config
        #[arg(long)]
        symbols: Option<String>,
        #[arg(long)]
        weeks: Option<usize>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a backtest over generated demo data
    Demo {
        #[arg(long, default_value = "AAPL,GOOGL,MSFT,TSLA")]
        symbols: String,
        #[arg(long, default_value_t = 365)]
        days: usize,
        #[arg(long, default_value_t = 52)]
        weeks: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 10_000.0)]
        cash: f64,
        /// Write an SVG chart of portfolio value and drawdown
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Show suitability metrics and the current signal for symbol(s)
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for configured symbol(s)
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
            output,
            chart,
            symbols,
            weeks,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, symbols.as_deref())
            } else {
                run_backtest_cmd(&config, output, chart, symbols.as_deref(), weeks)
            }
        }
        Command::Demo {
            symbols,
            days,
            weeks,
            seed,
            cash,
            chart,
        } => run_demo(&symbols, days, weeks, seed, cash, chart),
        Command::Analyze { config, symbol } => run_analyze(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_simulation_config(adapter: &dyn ConfigPort) -> SimulationConfig {
    SimulationConfig {
        selector: SelectorConfig {
            min_volatility: adapter.get_double("selector", "min_volatility", 0.01),
            max_volatility: adapter.get_double("selector", "max_volatility", 0.5),
            min_data_points: adapter.get_int("selector", "min_data_points", 30).max(0) as usize,
        },
        engine: EngineConfig {
            buy_threshold: adapter.get_double("engine", "buy_threshold", -0.05),
            sell_threshold: adapter.get_double("engine", "sell_threshold", 0.10),
            buy_amount: adapter.get_double("engine", "buy_amount", 5.0),
            sell_amount: adapter.get_double("engine", "sell_amount", 10.0),
        },
        initial_cash: adapter.get_double("simulation", "initial_cash", 10_000.0),
        weeks: adapter.get_int("simulation", "weeks", 52).max(0) as usize,
    }
}

pub fn resolve_symbols(symbols_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    let raw = match symbols_override {
        Some(s) => s.to_string(),
        None => config.get_string("data", "symbols").unwrap_or_default(),
    };
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Fetch every symbol's history, skipping symbols that fail with a warning.
fn load_universe(
    data_port: &dyn DataPort,
    symbols: &[String],
) -> BTreeMap<String, PriceSeries> {
    let mut data = BTreeMap::new();
    for symbol in symbols {
        match data_port.fetch_prices(symbol) {
            Ok(series) => {
                data.insert(symbol.clone(), series);
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
            }
        }
    }
    data
}

/// Where the pipeline's output goes once a run finishes.
struct ReportOptions {
    output: Option<PathBuf>,
    chart: Option<PathBuf>,
    include_history: bool,
}

fn run_backtest_cmd(
    config_path: &PathBuf,
    output_path: Option<PathBuf>,
    chart_path: Option<PathBuf>,
    symbols_override: Option<&str>,
    weeks_override: Option<usize>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let mut config = build_simulation_config(&adapter);
    if let Some(weeks) = weeks_override {
        config.weeks = weeks;
    }

    let symbols = resolve_symbols(symbols_override, &adapter);
    if symbols.is_empty() {
        eprintln!("error: no symbols configured");
        return ExitCode::from(2);
    }

    let data_dir = adapter.get_string("data", "dir").unwrap_or_default();
    let data_port = CsvAdapter::new(PathBuf::from(data_dir));

    let report = ReportOptions {
        output: output_path,
        chart: chart_path,
        include_history: adapter.get_bool("report", "include_history", true),
    };
    run_pipeline(&data_port, &symbols, &config, &report)
}

fn run_demo(
    symbols: &str,
    days: usize,
    weeks: usize,
    seed: u64,
    cash: f64,
    chart: Option<PathBuf>,
) -> ExitCode {
    let symbols: Vec<String> = symbols
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    if symbols.is_empty() {
        eprintln!("error: no symbols given");
        return ExitCode::from(2);
    }

    eprintln!(
        "Generating {} days of demo data for {} symbols (seed {})",
        days,
        symbols.len(),
        seed
    );
    let data_port = DemoDataAdapter::new(symbols.clone(), days, seed);

    let config = SimulationConfig {
        initial_cash: cash,
        weeks,
        ..SimulationConfig::default()
    };

    let report = ReportOptions {
        output: None,
        chart,
        include_history: true,
    };
    run_pipeline(&data_port, &symbols, &config, &report)
}

fn run_pipeline(
    data_port: &dyn DataPort,
    symbols: &[String],
    config: &SimulationConfig,
    report: &ReportOptions,
) -> ExitCode {
    let data = load_universe(data_port, symbols);
    if data.is_empty() {
        eprintln!("error: no symbols with data to backtest");
        return ExitCode::from(5);
    }

    let total_dates: usize = crate::domain::backtest::build_timeline(&data).len();
    eprintln!(
        "Running backtest: {} symbols, {} dates, {} weeks",
        data.len(),
        total_dates,
        config.weeks
    );

    let result = match run_backtest(&data, config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&result);
    write_report(&result, report)
}

fn print_summary(result: &BacktestResult) {
    eprintln!("\n=== Results ===");
    eprintln!("Initial cash:   ${:.2}", result.initial_cash);
    eprintln!("Final value:    ${:.2}", result.final_snapshot.total_value);
    eprintln!("Total return:   {:.2}%", result.metrics.total_return * 100.0);
    eprintln!("Max drawdown:   {:.2}%", result.metrics.max_drawdown * 100.0);
    eprintln!(
        "Trades:         {} ({} buys, {} sells)",
        result.metrics.total_trades, result.metrics.buy_trades, result.metrics.sell_trades
    );
}

fn write_report(result: &BacktestResult, opts: &ReportOptions) -> ExitCode {
    let report = TextReportAdapter::new(opts.include_history);
    match &opts.output {
        Some(path) => {
            let mut buf = Vec::new();
            if let Err(e) = report.write(result, &mut buf) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            match fs::write(path, &buf) {
                Ok(()) => eprintln!("\nReport written to: {}", path.display()),
                Err(e) => {
                    eprintln!("error: failed to write report: {e}");
                    return ExitCode::from(1);
                }
            }
        }
        None => {
            let mut stdout = std::io::stdout();
            if let Err(e) = report.write(result, &mut stdout) {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    if let Some(path) = &opts.chart {
        let mut buf = Vec::new();
        if let Err(e) = SvgChartAdapter::new().write(result, &mut buf) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        match fs::write(path, &buf) {
            Ok(()) => eprintln!("Chart written to: {}", path.display()),
            Err(e) => {
                eprintln!("error: failed to write chart: {e}");
                return ExitCode::from(1);
            }
        }
    }

    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &PathBuf, symbols_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let config = build_simulation_config(&adapter);
    eprintln!("\nSimulation:");
    eprintln!("  initial_cash: {}", config.initial_cash);
    eprintln!("  weeks:        {}", config.weeks);
    eprintln!(
        "  volatility:   {} to {}",
        config.selector.min_volatility, config.selector.max_volatility
    );
    eprintln!(
        "  thresholds:   buy {} / sell {}",
        config.engine.buy_threshold, config.engine.sell_threshold
    );

    let symbols = resolve_symbols(symbols_override, &adapter);
    if symbols.is_empty() {
        eprintln!("error: no symbols configured");
        return ExitCode::from(2);
    }
    eprintln!("\nUniverse: {}", symbols.join(", "));

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_analyze(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let config = build_simulation_config(&adapter);
    let data_dir = adapter.get_string("data", "dir").unwrap_or_default();
    let data_port = CsvAdapter::new(PathBuf::from(data_dir));

    let symbols = resolve_symbols(symbol, &adapter);
    let mut failures = 0;

    for sym in &symbols {
        let series = match data_port.fetch_prices(sym) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                failures += 1;
                continue;
            }
        };

        let view = series.as_view();
        let suitability = selector::evaluate(view, &config.selector);
        println!("{}:", sym);
        println!("  data points:    {}", suitability.data_points);
        println!("  volatility:     {:.4}", suitability.volatility);
        println!("  predictability: {:.4}", suitability.predictability);
        println!(
            "  suitable:       {}",
            if suitability.is_suitable(&config.selector) {
                "yes"
            } else {
                "no"
            }
        );

        if let Some(last) = view.last() {
            let sig = engine::signal(view, last.date, &config.engine);
            match sig.weekly_change {
                Some(change) => println!(
                    "  signal:         {} ({:+.2}% over the week at {:.2})",
                    sig.action,
                    change * 100.0,
                    sig.price
                ),
                None => println!("  signal:         {} (insufficient history)", sig.action),
            }
        }
    }

    if failures > 0 && failures == symbols.len() {
        return ExitCode::from(5);
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let data_dir = adapter.get_string("data", "dir").unwrap_or_default();
    let data_port = CsvAdapter::new(PathBuf::from(data_dir));

    for sym in resolve_symbols(symbol, &adapter) {
        match data_port.get_data_range(&sym) {
            Ok((first, last)) => println!("{}: {} to {}", sym, first, last),
            Err(e) => {
                eprintln!("error querying {}: {}", sym, e);
            }
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> FileConfigAdapter {
        FileConfigAdapter::from_string(
            r#"
[data]
dir = ./prices
symbols = aapl, msft , tsla

[simulation]
initial_cash = 500.0
weeks = 12

[selector]
min_volatility = 0.02
max_volatility = 0.4
min_data_points = 20

[engine]
buy_threshold = -0.04
sell_threshold = 0.08
buy_amount = 2.5
sell_amount = 7.5
"#,
        )
        .unwrap()
    }

    #[test]
    fn build_simulation_config_reads_all_sections() {
        let config = build_simulation_config(&sample_config());
        assert_eq!(config.initial_cash, 500.0);
        assert_eq!(config.weeks, 12);
        assert_eq!(config.selector.min_volatility, 0.02);
        assert_eq!(config.selector.max_volatility, 0.4);
        assert_eq!(config.selector.min_data_points, 20);
        assert_eq!(config.engine.buy_threshold, -0.04);
        assert_eq!(config.engine.sell_threshold, 0.08);
        assert_eq!(config.engine.buy_amount, 2.5);
        assert_eq!(config.engine.sell_amount, 7.5);
    }

    #[test]
    fn build_simulation_config_defaults_for_empty() {
        let adapter = FileConfigAdapter::from_string("[simulation]\n").unwrap();
        let config = build_simulation_config(&adapter);
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn resolve_symbols_from_config_trims_and_uppercases() {
        let symbols = resolve_symbols(None, &sample_config());
        assert_eq!(symbols, vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn resolve_symbols_override_wins() {
        let symbols = resolve_symbols(Some("nvda,amd"), &sample_config());
        assert_eq!(symbols, vec!["NVDA", "AMD"]);
    }

    #[test]
    fn resolve_symbols_empty_config_is_empty() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        assert!(resolve_symbols(None, &adapter).is_empty());
    }
}
