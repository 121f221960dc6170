//! Portfolio state: cash, fractional holdings, and append-only trade
//! and valuation histories.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use super::engine::Action;

/// Share counts below this are treated as zero after a sell.
const DUST_SHARES: f64 = 1e-10;

/// An executed trade, immutable once appended to the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub symbol: String,
    pub action: Action,
    pub shares: f64,
    pub price: f64,
    pub dollar_amount: f64,
    pub weekly_change: Option<f64>,
}

/// Portfolio value at one simulated date.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationSnapshot {
    pub date: NaiveDate,
    pub cash: f64,
    pub holdings_value: f64,
    pub total_value: f64,
}

/// Expected, non-fatal trade failures: the offending trade is skipped
/// and the simulation continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("insufficient shares")]
    InsufficientShares,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_cash: f64,
    /// symbol -> share count. BTreeMap keeps iteration (and therefore
    /// reporting) order deterministic.
    pub holdings: BTreeMap<String, f64>,
    pub trades: Vec<Trade>,
    pub history: Vec<ValuationSnapshot>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Portfolio {
            cash: initial_cash,
            initial_cash,
            holdings: BTreeMap::new(),
            trades: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn shares_of(&self, symbol: &str) -> f64 {
        self.holdings.get(symbol).copied().unwrap_or(0.0)
    }

    /// Buy `amount` dollars of `symbol` at `price`. No mutation on failure.
    pub fn buy(
        &mut self,
        symbol: &str,
        price: f64,
        amount: f64,
        date: NaiveDate,
        weekly_change: Option<f64>,
    ) -> Result<(), TradeError> {
        if self.cash < amount {
            return Err(TradeError::InsufficientFunds);
        }

        let shares = amount / price;
        self.cash -= amount;
        *self.holdings.entry(symbol.to_string()).or_insert(0.0) += shares;

        self.trades.push(Trade {
            date,
            symbol: symbol.to_string(),
            action: Action::Buy,
            shares,
            price,
            dollar_amount: amount,
            weekly_change,
        });
        Ok(())
    }

    /// Sell `amount` dollars of `symbol` at `price`. Fails when the held
    /// position is worth less than `amount`; no mutation on failure.
    /// Share counts never go negative.
    pub fn sell(
        &mut self,
        symbol: &str,
        price: f64,
        amount: f64,
        date: NaiveDate,
        weekly_change: Option<f64>,
    ) -> Result<(), TradeError> {
        let held = self.shares_of(symbol);
        if held * price < amount {
            return Err(TradeError::InsufficientShares);
        }

        let shares = amount / price;
        let remaining = (held - shares).max(0.0);
        if remaining < DUST_SHARES {
            self.holdings.remove(symbol);
        } else {
            self.holdings.insert(symbol.to_string(), remaining);
        }
        self.cash += amount;

        self.trades.push(Trade {
            date,
            symbol: symbol.to_string(),
            action: Action::Sell,
            shares,
            price,
            dollar_amount: amount,
            weekly_change,
        });
        Ok(())
    }

    /// Total value at current prices. Symbols without a known price
    /// contribute zero rather than failing.
    pub fn value_of(&self, prices: &HashMap<String, f64>) -> f64 {
        let holdings_value: f64 = self
            .holdings
            .iter()
            .filter_map(|(symbol, shares)| prices.get(symbol).map(|&price| shares * price))
            .sum();
        self.cash + holdings_value
    }

    /// Append one valuation snapshot. Callers are responsible for
    /// invoking this exactly once per simulated week.
    pub fn snapshot(&mut self, date: NaiveDate, prices: &HashMap<String, f64>) {
        let total_value = self.value_of(prices);
        self.history.push(ValuationSnapshot {
            date,
            cash: self.cash,
            holdings_value: total_value - self.cash,
            total_value,
        });
    }
}
