//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::DiptraderError;
use std::io::Write;

/// Port for rendering backtest results.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, out: &mut dyn Write) -> Result<(), DiptraderError>;
}
