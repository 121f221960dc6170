//! Price data access port trait.

use chrono::NaiveDate;

use crate::domain::error::DiptraderError;
use crate::domain::price_series::PriceSeries;

pub trait DataPort {
    /// Full closing-price history for one symbol, sorted by date.
    fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, DiptraderError>;

    /// Every symbol this source can serve, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, DiptraderError>;

    /// First and last dates this source holds for one symbol.
    fn get_data_range(&self, symbol: &str) -> Result<(NaiveDate, NaiveDate), DiptraderError> {
        let series = self.fetch_prices(symbol)?;
        match (series.first(), series.last()) {
            (Some(first), Some(last)) => Ok((first.date, last.date)),
            _ => Err(DiptraderError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }
}
