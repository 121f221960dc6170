//! CSV file data adapter.
//!
//! Reads one `{SYMBOL}.csv` per symbol from a base directory. Files
//! carry a `date,close` header; dates are `YYYY-MM-DD`.

use crate::domain::error::DiptraderError;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, DiptraderError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(DiptraderError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| DiptraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| DiptraderError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| DiptraderError::Data {
                reason: format!("missing date column in {}", path.display()),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                DiptraderError::Data {
                    reason: format!("invalid date {:?}: {}", date_str, e),
                }
            })?;

            let price: f64 = record
                .get(1)
                .ok_or_else(|| DiptraderError::Data {
                    reason: format!("missing close column in {}", path.display()),
                })?
                .parse()
                .map_err(|e| DiptraderError::Data {
                    reason: format!("invalid close value on {}: {}", date, e),
                })?;
            if !price.is_finite() || price <= 0.0 {
                return Err(DiptraderError::Data {
                    reason: format!(
                        "non-positive close {} on {} in {}",
                        price,
                        date,
                        path.display()
                    ),
                });
            }

            points.push(PricePoint { date, price });
        }

        if points.is_empty() {
            return Err(DiptraderError::NoData {
                symbol: symbol.to_string(),
            });
        }

        Ok(PriceSeries::new(symbol.to_string(), points))
    }

    fn list_symbols(&self) -> Result<Vec<String>, DiptraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DiptraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DiptraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
