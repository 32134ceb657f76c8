use crate::analysis::metrics::{InstrumentMetrics, MetricSet};
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// The recognized scoring metrics. The normalization direction is attached
/// here rather than inferred from name membership, so a renamed or new
/// metric cannot silently normalize the wrong way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AnnualizedReturn,
    Volatility,
    SharpeRatio,
    MaxDrawdown,
    WinRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::AnnualizedReturn,
        Metric::Volatility,
        Metric::SharpeRatio,
        Metric::MaxDrawdown,
        Metric::WinRate,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::AnnualizedReturn => "annualized_return",
            Self::Volatility => "volatility",
            Self::SharpeRatio => "sharpe_ratio",
            Self::MaxDrawdown => "max_drawdown",
            Self::WinRate => "win_rate",
        }
    }

    /// Which numeric end of a metric is the good one. Max drawdown is
    /// negative-valued and closer to zero means a shallower decline, so
    /// numerically higher is better; volatility is the only metric where
    /// smaller is better.
    pub fn direction(&self) -> Direction {
        match self {
            Self::AnnualizedReturn | Self::SharpeRatio | Self::WinRate | Self::MaxDrawdown => {
                Direction::HigherIsBetter
            }
            Self::Volatility => Direction::LowerIsBetter,
        }
    }

    pub fn value_in(&self, metrics: &MetricSet) -> Option<f64> {
        match self {
            Self::AnnualizedReturn => Some(metrics.annualized_return),
            Self::Volatility => Some(metrics.volatility),
            Self::SharpeRatio => metrics.sharpe_ratio,
            Self::MaxDrawdown => Some(metrics.max_drawdown),
            Self::WinRate => Some(metrics.win_rate),
        }
    }
}

/// Non-negative scoring weights per metric; any subset of the recognized
/// metrics is acceptable and the weights need not sum to 1.
///
/// The composite score is the weighted sum of the normalized metrics that
/// are actually present. Weights for absent metrics are ignored without
/// renormalizing the rest, so a partial override compresses the score
/// scale; callers that care about proportionality must supply all five.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    entries: BTreeMap<Metric, f64>,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            entries: BTreeMap::from([
                (Metric::AnnualizedReturn, 0.35),
                (Metric::SharpeRatio, 0.30),
                (Metric::MaxDrawdown, 0.15),
                (Metric::Volatility, 0.10),
                (Metric::WinRate, 0.10),
            ]),
        }
    }
}

impl Weights {
    pub fn try_new(entries: BTreeMap<Metric, f64>) -> anyhow::Result<Self> {
        ensure!(!entries.is_empty(), "weights must cover at least one metric");
        for (metric, weight) in &entries {
            ensure!(
                weight.is_finite() && *weight >= 0.0,
                "weight for {} must be a non-negative number (got {weight})",
                metric.key()
            );
        }
        Ok(Self { entries })
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.entries.get(&metric).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.entries.iter().map(|(m, w)| (*m, *w))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub instrument_id: String,
    pub score: f64,
}

/// Instruments ordered by composite score, best first. Equal scores keep
/// the universe input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedList {
    entries: Vec<RankedEntry>,
}

impl RankedList {
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_ids(&self, n: usize) -> Vec<String> {
        self.entries
            .iter()
            .take(n)
            .map(|e| e.instrument_id.clone())
            .collect()
    }

    /// Ids in the top half of the ranking: the first `len / 2` entries.
    /// The exact middle of an odd-sized universe is excluded.
    pub fn top_half_ids(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .take(self.entries.len() / 2)
            .map(|e| e.instrument_id.as_str())
            .collect()
    }
}

/// Normalize each weighted metric across the universe to [0, 1] and
/// combine into a composite score per instrument.
///
/// Min-max normalization; lower-is-better metrics are flipped. A metric
/// with no spread across the universe normalizes to 0 for everyone and
/// differentiates nothing. An instrument missing a metric value (null
/// Sharpe) simply gets no contribution from that metric.
pub fn rank_universe(metrics: &[InstrumentMetrics], weights: &Weights) -> RankedList {
    let mut scores = vec![0.0f64; metrics.len()];

    for (metric, weight) in weights.iter() {
        let values: Vec<Option<f64>> = metrics
            .iter()
            .map(|row| metric.value_in(&row.metrics))
            .collect();

        let mut present = values.iter().flatten().copied();
        let Some(first) = present.next() else {
            continue;
        };
        let (min, max) = present.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let spread = max - min;

        for (score, value) in scores.iter_mut().zip(&values) {
            let Some(value) = value else {
                continue;
            };
            let normalized = if spread > 0.0 {
                let scaled = (value - min) / spread;
                match metric.direction() {
                    Direction::HigherIsBetter => scaled,
                    Direction::LowerIsBetter => 1.0 - scaled,
                }
            } else {
                0.0
            };
            *score += weight * normalized;
        }
    }

    let mut entries: Vec<RankedEntry> = metrics
        .iter()
        .zip(scores)
        .map(|(row, score)| RankedEntry {
            instrument_id: row.instrument_id.clone(),
            score,
        })
        .collect();

    // Stable sort: ties keep universe input order.
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    RankedList { entries }
}
