use crate::domain::series::{PriceSeries, ReturnPoint, ReturnSeries};
use crate::error::AnalysisError;

/// Derive the monthly fractional return series from a price/NAV series:
/// `r_t = (v_t - v_{t-1}) / v_{t-1}`.
///
/// The first period has no return and is dropped, so the output has
/// exactly one fewer point than the input, aligned with periods 2..N.
pub fn build_return_series(prices: &PriceSeries) -> anyhow::Result<ReturnSeries> {
    if prices.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            what: "price series",
            needed: 2,
            got: prices.len(),
        }
        .into());
    }

    let points = prices
        .points()
        .windows(2)
        .map(|w| ReturnPoint {
            month: w[1].month,
            value: (w[1].value - w[0].value) / w[0].value,
        })
        .collect();

    ReturnSeries::try_new(points)
}
