//! Signal generation from weekly price deltas.
//!
//! Buy a fixed dollar amount after a weekly drop, sell a fixed dollar
//! amount after a weekly rise, otherwise hold.

use chrono::{Duration, NaiveDate};

use super::price_series::PriceSeriesView;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Weekly change at or below this triggers a buy. Negative.
    pub buy_threshold: f64,
    /// Weekly change at or above this triggers a sell. Positive.
    pub sell_threshold: f64,
    pub buy_amount: f64,
    pub sell_amount: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            buy_threshold: -0.05,
            sell_threshold: 0.10,
            buy_amount: 5.0,
            sell_amount: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

/// One trading decision for one symbol at one simulation step.
/// Produced fresh each step, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    pub action: Action,
    /// Dollar amount to trade; zero for holds.
    pub amount: f64,
    /// Evaluation-date price the decision was made at.
    pub price: f64,
    /// 7-calendar-day percentage delta ending at the evaluation date.
    /// Absent when too little history precedes the date.
    pub weekly_change: Option<f64>,
}

impl Signal {
    fn hold(symbol: &str, price: f64, weekly_change: Option<f64>) -> Self {
        Signal {
            symbol: symbol.to_string(),
            action: Action::Hold,
            amount: 0.0,
            price,
            weekly_change,
        }
    }
}

/// Percentage change between the price at `as_of` and the price seven
/// calendar days earlier, both resolved on-or-before. `None` when no
/// point exists a week back or either price is unusable.
pub fn weekly_change(prices: PriceSeriesView<'_>, as_of: NaiveDate) -> Option<f64> {
    let current = prices.price_on_or_before(as_of)?;
    let week_ago = prices.price_on_or_before(as_of - Duration::days(7))?;

    if week_ago.price.abs() < 1e-10 {
        return None;
    }

    Some((current.price - week_ago.price) / week_ago.price)
}

/// Generate a signal for one symbol. Pure: no portfolio awareness,
/// affordability is enforced downstream.
///
/// Decision order matters: the buy branch is checked first, so a symbol
/// can never be both a buy and a sell in the same evaluation.
pub fn signal(prices: PriceSeriesView<'_>, as_of: NaiveDate, config: &EngineConfig) -> Signal {
    let symbol = prices.symbol;
    let price = match prices.price_on_or_before(as_of) {
        Some(p) => p.price,
        None => return Signal::hold(symbol, 0.0, None),
    };
    // A near-zero price cannot be traded: buying at it would produce a
    // non-finite share count downstream.
    if price.abs() < 1e-10 {
        return Signal::hold(symbol, price, None);
    }

    let change = match weekly_change(prices, as_of) {
        Some(c) => c,
        None => return Signal::hold(symbol, price, None),
    };

    if change <= config.buy_threshold {
        Signal {
            symbol: symbol.to_string(),
            action: Action::Buy,
            amount: config.buy_amount,
            price,
            weekly_change: Some(change),
        }
    } else if change >= config.sell_threshold {
        Signal {
            symbol: symbol.to_string(),
            action: Action::Sell,
            amount: config.sell_amount,
            price,
            weekly_change: Some(change),
        }
    } else {
        Signal::hold(symbol, price, Some(change))
    }
}
