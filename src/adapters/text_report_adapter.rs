//! Plain-text report adapter implementing ReportPort.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::DiptraderError;
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub struct TextReportAdapter {
    /// Render the per-snapshot portfolio value table. Long runs can
    /// turn it off via `[report] include_history = false`.
    include_history: bool,
}

impl TextReportAdapter {
    pub fn new(include_history: bool) -> Self {
        Self { include_history }
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, result: &BacktestResult, out: &mut dyn Write) -> Result<(), DiptraderError> {
        writeln!(out, "====================================")?;
        writeln!(out, " Backtest Report")?;
        writeln!(out, "====================================")?;
        writeln!(out, "Initial cash:  ${:.2}", result.initial_cash)?;
        writeln!(out, "Final value:   ${:.2}", result.final_snapshot.total_value)?;
        writeln!(
            out,
            "Total return:  {:.2}%",
            result.metrics.total_return * 100.0
        )?;
        writeln!(
            out,
            "Max drawdown:  {:.2}%",
            result.metrics.max_drawdown * 100.0
        )?;
        writeln!(
            out,
            "Trades:        {} ({} buys, {} sells)",
            result.metrics.total_trades, result.metrics.buy_trades, result.metrics.sell_trades
        )?;

        if !result.trades.is_empty() {
            writeln!(out)?;
            writeln!(out, "Trades")?;
            writeln!(out, "------")?;
            for trade in &result.trades {
                let weekly = match trade.weekly_change {
                    Some(c) => format!("{:+.2}%", c * 100.0),
                    None => "n/a".to_string(),
                };
                writeln!(
                    out,
                    "{}  {:<4} {:<6} {:>12.6} @ {:>10.2}  (${:.2}, weekly {})",
                    trade.date,
                    trade.action,
                    trade.symbol,
                    trade.shares,
                    trade.price,
                    trade.dollar_amount,
                    weekly
                )?;
            }
        }

        if !result.final_holdings.is_empty() {
            writeln!(out)?;
            writeln!(out, "Final holdings")?;
            writeln!(out, "--------------")?;
            for (symbol, shares) in &result.final_holdings {
                writeln!(out, "{:<6} {:>12.6}", symbol, shares)?;
            }
        }

        if self.include_history {
            writeln!(out)?;
            writeln!(out, "Portfolio value")?;
            writeln!(out, "---------------")?;
            for snap in &result.history {
                writeln!(
                    out,
                    "{}  cash {:>12.2}  holdings {:>12.2}  total {:>12.2}",
                    snap.date, snap.cash, snap.holdings_value, snap.total_value
                )?;
            }
        }

        Ok(())
    }
}
