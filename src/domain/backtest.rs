//! Backtest engine and weekly simulation loop.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::engine::{self, Action, EngineConfig};
use super::error::DiptraderError;
use super::metrics::Metrics;
use super::portfolio::{Portfolio, Trade, ValuationSnapshot};
use super::price_series::{PriceSeries, PriceSeriesView};
use super::selector::{self, SelectorConfig};

/// Minimum number of distinct dates across all symbols for a run to start.
pub const MIN_HISTORY_DAYS: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub selector: SelectorConfig,
    pub engine: EngineConfig,
    pub initial_cash: f64,
    pub weeks: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            selector: SelectorConfig::default(),
            engine: EngineConfig::default(),
            initial_cash: 10_000.0,
            weeks: 52,
        }
    }
}

/// The sole output of a run. Constructed once after the loop completes
/// and handed to callers by value.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub initial_cash: f64,
    pub final_snapshot: ValuationSnapshot,
    pub metrics: Metrics,
    pub trades: Vec<Trade>,
    pub history: Vec<ValuationSnapshot>,
    pub final_holdings: BTreeMap<String, f64>,
}

/// Sorted union of every symbol's dates.
pub fn build_timeline(data: &BTreeMap<String, PriceSeries>) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = data
        .values()
        .flat_map(|series| series.points().iter().map(|p| p.date))
        .collect();
    dates.into_iter().collect()
}

/// Run the week-by-week simulation.
///
/// Each step truncates every series to the simulated "now" before the
/// selector or the engine sees it, so no decision can use data dated
/// after the current step. Trades are applied in sorted symbol order;
/// given identical inputs the whole run is reproducible.
pub fn run_backtest(
    data: &BTreeMap<String, PriceSeries>,
    config: &SimulationConfig,
) -> Result<BacktestResult, DiptraderError> {
    let timeline = build_timeline(data);
    if timeline.len() < MIN_HISTORY_DAYS {
        return Err(DiptraderError::InsufficientHistory {
            days: timeline.len(),
            minimum: MIN_HISTORY_DAYS,
        });
    }

    let mut portfolio = Portfolio::new(config.initial_cash);

    let start_date = timeline[0];
    portfolio.snapshot(start_date, &prices_at(data, start_date));

    // Start one week in so a full week of history precedes the first
    // evaluation.
    let mut i = 7;
    let mut weeks_processed = 0;

    while i < timeline.len() && weeks_processed < config.weeks {
        let current_date = timeline[i];

        let windows: BTreeMap<String, PriceSeriesView<'_>> = data
            .iter()
            .map(|(symbol, series)| (symbol.clone(), series.truncate(current_date)))
            .filter(|(_, view)| !view.is_empty())
            .collect();

        let current_prices: HashMap<String, f64> = windows
            .iter()
            .filter_map(|(symbol, view)| view.last().map(|p| (symbol.clone(), p.price)))
            .collect();

        for symbol in selector::filter_universe(&windows, &config.selector) {
            let sig = engine::signal(windows[&symbol], current_date, &config.engine);
            // Unaffordable trades are skipped, not recorded.
            let _ = match sig.action {
                Action::Buy => portfolio.buy(
                    &symbol,
                    sig.price,
                    sig.amount,
                    current_date,
                    sig.weekly_change,
                ),
                Action::Sell => portfolio.sell(
                    &symbol,
                    sig.price,
                    sig.amount,
                    current_date,
                    sig.weekly_change,
                ),
                Action::Hold => Ok(()),
            };
        }

        portfolio.snapshot(current_date, &current_prices);

        i += 7;
        weeks_processed += 1;
    }

    let metrics = Metrics::compute(&portfolio.history, &portfolio.trades);
    // History always holds at least the initial snapshot.
    let final_snapshot = portfolio.history.last().cloned().unwrap_or(ValuationSnapshot {
        date: start_date,
        cash: config.initial_cash,
        holdings_value: 0.0,
        total_value: config.initial_cash,
    });

    Ok(BacktestResult {
        initial_cash: config.initial_cash,
        final_snapshot,
        metrics,
        trades: portfolio.trades,
        history: portfolio.history,
        final_holdings: portfolio.holdings,
    })
}

fn prices_at(data: &BTreeMap<String, PriceSeries>, date: NaiveDate) -> HashMap<String, f64> {
    data.iter()
        .filter_map(|(symbol, series)| {
            series
                .price_on_or_before(date)
                .map(|p| (symbol.clone(), p.price))
        })
        .collect()
}
