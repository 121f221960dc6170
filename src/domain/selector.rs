//! Stock suitability screening.
//!
//! Filters the trading universe down to symbols whose volatility sits in a
//! configured band and whose price action is consistent enough to trade.

use std::collections::BTreeMap;

use super::price_series::PriceSeriesView;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Minimum predictability score for a symbol to enter the universe.
pub const MIN_PREDICTABILITY: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    pub min_volatility: f64,
    pub max_volatility: f64,
    pub min_data_points: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            min_volatility: 0.01,
            max_volatility: 0.5,
            min_data_points: 30,
        }
    }
}

/// Per-symbol screening metrics, recomputed for each evaluation window.
#[derive(Debug, Clone, PartialEq)]
pub struct SuitabilityResult {
    /// Annualized standard deviation of daily returns. Zero when the
    /// window is too short to compute returns.
    pub volatility: f64,
    /// Score in [0, 1]; see [`predictability`].
    pub predictability: f64,
    pub data_points: usize,
}

impl SuitabilityResult {
    pub fn is_suitable(&self, config: &SelectorConfig) -> bool {
        self.data_points >= config.min_data_points
            && self.volatility >= config.min_volatility
            && self.volatility <= config.max_volatility
            && self.predictability >= MIN_PREDICTABILITY
    }
}

/// Annualized volatility of period-over-period returns, or `None` when
/// fewer than two returns exist.
pub fn volatility(prices: PriceSeriesView<'_>) -> Option<f64> {
    let returns = prices.returns();
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    // Sample standard deviation
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Predictability score in [0, 1]. Weighted blend of two signals:
/// how close the annualized volatility sits to the middle of the
/// configured band (weight 0.6), and what fraction of consecutive
/// returns share the same sign (weight 0.4).
pub fn predictability(prices: PriceSeriesView<'_>, config: &SelectorConfig) -> f64 {
    if prices.len() < config.min_data_points {
        return 0.0;
    }

    let vol = match volatility(prices) {
        Some(v) => v,
        None => return 0.0,
    };

    let volatility_score = if vol < config.min_volatility || vol > config.max_volatility {
        0.0
    } else {
        let mid = (config.min_volatility + config.max_volatility) / 2.0;
        let max_distance = (config.max_volatility - config.min_volatility) / 2.0;
        1.0 - (vol - mid).abs() / max_distance
    };

    let returns = prices.returns();
    if returns.len() < 2 {
        return 0.0;
    }

    let same_direction = returns
        .windows(2)
        .filter(|w| w[0] * w[1] > 0.0)
        .count() as f64;
    let consistency_score = same_direction / (returns.len() - 1) as f64;

    (0.6 * volatility_score + 0.4 * consistency_score).clamp(0.0, 1.0)
}

/// Compute screening metrics for one symbol's visible history.
/// Pure function of its inputs; windows shorter than `min_data_points`
/// score zero without further computation.
pub fn evaluate(prices: PriceSeriesView<'_>, config: &SelectorConfig) -> SuitabilityResult {
    let data_points = prices.len();
    if data_points < config.min_data_points {
        return SuitabilityResult {
            volatility: 0.0,
            predictability: 0.0,
            data_points,
        };
    }

    SuitabilityResult {
        volatility: volatility(prices).unwrap_or(0.0),
        predictability: predictability(prices, config),
        data_points,
    }
}

/// Filter a universe down to suitable symbols, in sorted symbol order.
/// Returns an empty vec, never an error, when no symbol qualifies.
pub fn filter_universe<'a>(
    universe: &BTreeMap<String, PriceSeriesView<'a>>,
    config: &SelectorConfig,
) -> Vec<String> {
    universe
        .iter()
        .filter(|(_, prices)| evaluate(**prices, config).is_suitable(config))
        .map(|(symbol, _)| symbol.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_series::{PricePoint, PriceSeries};
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                price,
            })
            .collect();
        PriceSeries::new("TEST".into(), points)
    }

    /// Gentle alternating wiggle around 100: in-band volatility and
    /// some directional consistency.
    fn tradeable_prices(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let cycle = (i % 10) as f64;
                100.0 + cycle * 0.4
            })
            .collect()
    }

    #[test]
    fn volatility_constant_series_is_zero() {
        let series = make_series(&vec![100.0; 40]);
        let vol = volatility(series.as_view()).unwrap();
        assert!((vol - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn volatility_requires_two_returns() {
        let series = make_series(&[100.0, 101.0]);
        assert!(volatility(series.as_view()).is_none());
    }

    #[test]
    fn volatility_known_value() {
        // Returns alternate +1% / -1%(ish); sample stdev of returns
        // times sqrt(252) should land well inside (0, 1).
        let mut prices = Vec::new();
        let mut p = 100.0;
        for i in 0..60 {
            p *= if i % 2 == 0 { 1.01 } else { 0.99 };
            prices.push(p);
        }
        let vol = volatility(make_series(&prices).as_view()).unwrap();
        assert!(vol > 0.0 && vol < 1.0, "vol = {vol}");
    }

    #[test]
    fn evaluate_too_few_points_scores_zero() {
        let config = SelectorConfig::default();
        let series = make_series(&tradeable_prices(10));
        let result = evaluate(series.as_view(), &config);

        assert_eq!(result.data_points, 10);
        assert!((result.volatility - 0.0).abs() < f64::EPSILON);
        assert!((result.predictability - 0.0).abs() < f64::EPSILON);
        assert!(!result.is_suitable(&config));
    }

    #[test]
    fn evaluate_flat_series_unsuitable() {
        // Zero volatility falls below min_volatility.
        let config = SelectorConfig::default();
        let result = evaluate(make_series(&vec![100.0; 40]).as_view(), &config);
        assert!(!result.is_suitable(&config));
    }

    #[test]
    fn evaluate_extreme_volatility_unsuitable() {
        let mut prices = Vec::new();
        let mut p = 100.0;
        for i in 0..40 {
            p *= if i % 2 == 0 { 1.5 } else { 0.6 };
            prices.push(p);
        }
        let config = SelectorConfig::default();
        let result = evaluate(make_series(&prices).as_view(), &config);
        assert!(result.volatility > config.max_volatility);
        assert!(!result.is_suitable(&config));
    }

    #[test]
    fn evaluate_tradeable_series_suitable() {
        let config = SelectorConfig::default();
        let result = evaluate(make_series(&tradeable_prices(60)).as_view(), &config);

        assert!(result.volatility >= config.min_volatility);
        assert!(result.volatility <= config.max_volatility);
        assert!(result.predictability >= MIN_PREDICTABILITY);
        assert!(result.is_suitable(&config));
    }

    #[test]
    fn predictability_bounded() {
        let config = SelectorConfig::default();
        for prices in [
            tradeable_prices(60),
            vec![100.0; 40],
            (0..50).map(|i| 50.0 + i as f64).collect(),
        ] {
            let score = predictability(make_series(&prices).as_view(), &config);
            assert!((0.0..=1.0).contains(&score), "score = {score}");
        }
    }

    #[test]
    fn evaluate_is_deterministic() {
        let config = SelectorConfig::default();
        let series = make_series(&tradeable_prices(60));
        let a = evaluate(series.as_view(), &config);
        let b = evaluate(series.as_view(), &config);
        assert_eq!(a, b);
    }

    #[test]
    fn filter_universe_empty_when_none_qualify() {
        let config = SelectorConfig::default();
        let flat = make_series(&vec![100.0; 40]);
        let short = make_series(&[100.0, 101.0]);

        let mut universe = BTreeMap::new();
        universe.insert("FLAT".to_string(), flat.as_view());
        universe.insert("SHORT".to_string(), short.as_view());

        assert!(filter_universe(&universe, &config).is_empty());
    }

    #[test]
    fn filter_universe_returns_sorted_symbols() {
        let config = SelectorConfig::default();
        let good_a = make_series(&tradeable_prices(60));
        let good_b = make_series(&tradeable_prices(60));
        let flat = make_series(&vec![100.0; 40]);

        let mut universe = BTreeMap::new();
        universe.insert("ZZZ".to_string(), good_a.as_view());
        universe.insert("AAA".to_string(), good_b.as_view());
        universe.insert("FLAT".to_string(), flat.as_view());

        let suitable = filter_universe(&universe, &config);
        assert_eq!(suitable, vec!["AAA", "ZZZ"]);
    }
}
