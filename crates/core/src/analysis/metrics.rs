use crate::analysis::config::AnalysisConfig;
use crate::domain::series::ReturnSeries;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Performance metrics for one instrument, computed once per analysis run
/// from its monthly return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub annualized_return: f64,
    pub volatility: f64,
    /// `None` when volatility is zero (the ratio is undefined).
    pub sharpe_ratio: Option<f64>,
    /// Worst peak-to-trough decline of compounded growth; always <= 0.
    pub max_drawdown: f64,
    /// Fraction of periods with a strictly positive return.
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMetrics {
    pub instrument_id: String,
    pub metrics: MetricSet,
}

/// Compute the metric table for a universe of return series.
///
/// Instruments with an empty return series are excluded from the output;
/// the input ordering of the survivors is preserved (the ranking tie-break
/// depends on it).
pub fn compute_metrics(
    returns: &[(String, ReturnSeries)],
    cfg: &AnalysisConfig,
) -> Vec<InstrumentMetrics> {
    let mut out = Vec::with_capacity(returns.len());

    for (id, series) in returns {
        if series.is_empty() {
            tracing::debug!(instrument = %id, "empty return series; excluded from metrics");
            continue;
        }

        out.push(InstrumentMetrics {
            instrument_id: id.clone(),
            metrics: metric_set(id, series, cfg),
        });
    }

    out
}

fn metric_set(id: &str, series: &ReturnSeries, cfg: &AnalysisConfig) -> MetricSet {
    let values: Vec<f64> = series.values().collect();

    let annualized_return = annualized_return(&values, cfg.periods_per_year);
    let volatility = annualized_volatility(&values, cfg.periods_per_year);

    let sharpe_ratio = match sharpe_ratio(id, annualized_return, volatility, cfg.risk_free_rate) {
        Ok(ratio) => Some(ratio),
        Err(err) => {
            tracing::warn!(instrument = %id, error = %err, "sharpe ratio undefined; metric set to null");
            None
        }
    };

    MetricSet {
        annualized_return,
        volatility,
        sharpe_ratio,
        max_drawdown: max_drawdown(&values),
        win_rate: win_rate(&values),
    }
}

/// Compound the mean period return out to a year: `(1 + mean(r))^P - 1`.
fn annualized_return(returns: &[f64], periods_per_year: u32) -> f64 {
    (1.0 + mean(returns)).powi(periods_per_year as i32) - 1.0
}

/// Annualized standard deviation under the i.i.d. assumption:
/// `stdev(r) * sqrt(P)`.
fn annualized_volatility(returns: &[f64], periods_per_year: u32) -> f64 {
    stdev(returns) * f64::from(periods_per_year).sqrt()
}

fn sharpe_ratio(
    id: &str,
    annualized_return: f64,
    volatility: f64,
    risk_free_rate: f64,
) -> Result<f64, AnalysisError> {
    if volatility == 0.0 {
        return Err(AnalysisError::UndefinedRatio {
            ratio: "sharpe ratio",
            instrument: id.to_string(),
        });
    }
    Ok((annualized_return - risk_free_rate) / volatility)
}

/// Worst decline of the compounded growth curve from its running peak.
fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 1.0f64;
    let mut peak = 1.0f64;
    let mut worst = 0.0f64;

    for r in returns {
        cumulative *= 1.0 + r;
        peak = peak.max(cumulative);
        worst = worst.min(cumulative / peak - 1.0);
    }

    worst
}

fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let winners = returns.iter().filter(|r| **r > 0.0).count();
    winners as f64 / returns.len() as f64
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn stdev(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let m = mean(xs);
    let variance = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / xs.len() as f64;
    variance.sqrt()
}
