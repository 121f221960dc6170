//! Per-symbol price history.

use chrono::NaiveDate;

/// One closing price on one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Chronological price history for a single symbol.
///
/// Points are kept sorted by date, strictly increasing. Weekly lookups
/// use on-or-before semantics so gaps (weekends, holidays) are tolerated.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered points. Sorts by date and drops
    /// duplicate dates, keeping the last occurrence.
    pub fn new(symbol: String, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by(|b, a| {
            if a.date == b.date {
                a.price = b.price;
                true
            } else {
                false
            }
        });
        Self { symbol, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Latest point with `date <= as_of`.
    pub fn price_on_or_before(&self, as_of: NaiveDate) -> Option<&PricePoint> {
        match self.points.partition_point(|p| p.date <= as_of) {
            0 => None,
            n => Some(&self.points[n - 1]),
        }
    }

    /// View of the history visible at `as_of`: every point with
    /// `date <= as_of`. The simulation loop only ever hands this slice
    /// to the selector and the signal engine, so later data cannot leak
    /// into a decision.
    pub fn truncate(&self, as_of: NaiveDate) -> PriceSeriesView<'_> {
        let n = self.points.partition_point(|p| p.date <= as_of);
        PriceSeriesView {
            symbol: &self.symbol,
            points: &self.points[..n],
        }
    }

    /// Whole history as a view.
    pub fn as_view(&self) -> PriceSeriesView<'_> {
        PriceSeriesView {
            symbol: &self.symbol,
            points: &self.points,
        }
    }
}

/// Borrowed, date-bounded window of a [`PriceSeries`].
#[derive(Debug, Clone, Copy)]
pub struct PriceSeriesView<'a> {
    pub symbol: &'a str,
    points: &'a [PricePoint],
}

impl<'a> PriceSeriesView<'a> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &'a [PricePoint] {
        self.points
    }

    pub fn first(&self) -> Option<&'a PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&'a PricePoint> {
        self.points.last()
    }

    pub fn price_on_or_before(&self, as_of: NaiveDate) -> Option<&'a PricePoint> {
        match self.points.partition_point(|p| p.date <= as_of) {
            0 => None,
            n => Some(&self.points[n - 1]),
        }
    }

    /// Period-over-period returns between consecutive points.
    pub fn returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .filter(|w| w[0].price.abs() > 1e-10)
            .map(|w| (w[1].price - w[0].price) / w[0].price)
            .collect()
    }
}
