#![allow(dead_code)]

use chrono::NaiveDate;
use diptrader::domain::backtest::SimulationConfig;
use diptrader::domain::error::DiptraderError;
use diptrader::domain::price_series::{PricePoint, PriceSeries};
use diptrader::domain::selector::SelectorConfig;
use diptrader::ports::data_port::DataPort;
use std::collections::{BTreeMap, HashMap};

pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.symbol.clone(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, DiptraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DiptraderError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(series) => Ok(series.clone()),
            None => Err(DiptraderError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }

    fn list_symbols(&self) -> Result<Vec<String>, DiptraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting 2024-01-01.
pub fn daily_series(symbol: &str, prices: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 1);
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            price,
        })
        .collect();
    PriceSeries::new(symbol.to_string(), points)
}

pub fn universe(series: Vec<PriceSeries>) -> BTreeMap<String, PriceSeries> {
    series
        .into_iter()
        .map(|s| (s.symbol.clone(), s))
        .collect()
}

/// Declines 6% over the first week, then recovers to 103 by day 14.
/// Triggers exactly one buy at 94 under default thresholds.
pub fn dip_then_rally(symbol: &str) -> PriceSeries {
    daily_series(
        symbol,
        &[
            100.0, 99.0, 98.0, 97.0, 96.0, 95.0, 94.5, 94.0, 95.0, 96.0, 97.5, 99.0, 100.5,
            102.0, 103.0,
        ],
    )
}

/// Selector settings loose enough that short, consistently moving
/// series qualify.
pub fn permissive_config(weeks: usize, initial_cash: f64) -> SimulationConfig {
    SimulationConfig {
        selector: SelectorConfig {
            min_volatility: 0.0,
            max_volatility: 5.0,
            min_data_points: 5,
        },
        initial_cash,
        weeks,
        ..SimulationConfig::default()
    }
}
