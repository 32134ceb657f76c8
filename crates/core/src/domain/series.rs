use crate::error::AnalysisError;
use crate::time::month::Month;

/// One monthly observation of an instrument's adjusted value (close price
/// for equities, NAV for funds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub month: Month,
    pub value: f64,
}

/// A chronologically sorted monthly price/NAV series for one instrument.
///
/// The constructor enforces the input contract: strictly increasing months
/// (no duplicate periods) and finite, positive values.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn try_new(points: Vec<PricePoint>) -> anyhow::Result<Self> {
        for w in points.windows(2) {
            if w[1].month <= w[0].month {
                return Err(AnalysisError::MalformedSeries {
                    detail: format!(
                        "months must be strictly increasing ({} then {})",
                        w[0].month, w[1].month
                    ),
                }
                .into());
            }
        }

        for p in &points {
            if !p.value.is_finite() || p.value <= 0.0 {
                return Err(AnalysisError::MalformedSeries {
                    detail: format!("invalid value {} at {}", p.value, p.month),
                }
                .into());
            }
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One monthly fractional return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnPoint {
    pub month: Month,
    pub value: f64,
}

/// Period-over-period fractional returns for one instrument, months
/// strictly increasing. Derived from a `PriceSeries`; has one fewer point
/// than its source (the first period has no return).
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn try_new(points: Vec<ReturnPoint>) -> anyhow::Result<Self> {
        for w in points.windows(2) {
            if w[1].month <= w[0].month {
                return Err(AnalysisError::MalformedSeries {
                    detail: format!(
                        "months must be strictly increasing ({} then {})",
                        w[0].month, w[1].month
                    ),
                }
                .into());
            }
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.points.iter().map(|p| p.month)
    }

    /// The return observed in `month`, if any. Months are sorted, so this
    /// is a binary search.
    pub fn value_for(&self, month: Month) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.month.cmp(&month))
            .ok()
            .map(|i| self.points[i].value)
    }

    pub fn last_month(&self) -> Option<Month> {
        self.points.last().map(|p| p.month)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
