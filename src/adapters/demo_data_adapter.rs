//! Synthetic price data adapter for demo runs.
//!
//! Generates a deterministic random walk per symbol from a fixed seed,
//! with periodic single-day drops and rallies large enough to cross
//! the weekly signal thresholds.

use crate::domain::error::DiptraderError;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct DemoDataAdapter {
    symbols: Vec<String>,
    days: usize,
    seed: u64,
    start_date: NaiveDate,
}

impl DemoDataAdapter {
    pub fn new(symbols: Vec<String>, days: usize, seed: u64) -> Self {
        let mut symbols = symbols;
        symbols.sort();
        symbols.dedup();
        Self {
            symbols,
            days,
            seed,
            // Arbitrary fixed start so runs with the same seed match.
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap_or(NaiveDate::MIN),
        }
    }

    fn symbol_seed(&self, symbol: &str) -> u64 {
        symbol
            .bytes()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
    }
}

impl DataPort for DemoDataAdapter {
    fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, DiptraderError> {
        if !self.symbols.iter().any(|s| s == symbol) {
            return Err(DiptraderError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        let mut price: f64 = rng.gen_range(30.0..150.0);
        let mut points = Vec::with_capacity(self.days);

        for day in 0..self.days {
            match day % 30 {
                // A dip deep enough to read as at least -5% over a week,
                // sized so overall volatility stays inside the default band
                20 => price *= 0.93,
                // A rally past the +10% sell threshold
                27 => price *= 1.12,
                _ => price *= 1.0 + rng.gen_range(-0.015..0.015),
            }
            price = price.max(1.0);

            points.push(PricePoint {
                date: self.start_date + chrono::Duration::days(day as i64),
                price,
            });
        }

        Ok(PriceSeries::new(symbol.to_string(), points))
    }

    fn list_symbols(&self) -> Result<Vec<String>, DiptraderError> {
        Ok(self.symbols.clone())
    }
}
