//! Performance metrics over a completed valuation history.

use super::engine::Action;
use super::portfolio::{Trade, ValuationSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    /// Largest fractional decline from a running peak, >= 0.
    pub max_drawdown: f64,
    pub total_trades: usize,
    pub buy_trades: usize,
    pub sell_trades: usize,
}

impl Metrics {
    pub fn compute(history: &[ValuationSnapshot], trades: &[Trade]) -> Self {
        let initial_value = history.first().map(|s| s.total_value).unwrap_or(0.0);
        let final_value = history.last().map(|s| s.total_value).unwrap_or(0.0);

        let total_return = if initial_value > 0.0 {
            (final_value - initial_value) / initial_value
        } else {
            0.0
        };

        let buy_trades = trades.iter().filter(|t| t.action == Action::Buy).count();
        let sell_trades = trades.iter().filter(|t| t.action == Action::Sell).count();

        Metrics {
            total_return,
            max_drawdown: max_drawdown(history),
            total_trades: trades.len(),
            buy_trades,
            sell_trades,
        }
    }
}

/// Single left-to-right scan maintaining a running peak. Zero for a
/// non-decreasing history.
pub fn max_drawdown(history: &[ValuationSnapshot]) -> f64 {
    let mut peak = match history.first() {
        Some(s) => s.total_value,
        None => return 0.0,
    };
    let mut max_dd = 0.0_f64;

    for snapshot in history {
        if snapshot.total_value > peak {
            peak = snapshot.total_value;
        } else if peak > 0.0 {
            let dd = (peak - snapshot.total_value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
