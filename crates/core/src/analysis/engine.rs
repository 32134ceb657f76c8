use crate::analysis::config::AnalysisConfig;
use crate::analysis::metrics::{compute_metrics, InstrumentMetrics};
use crate::analysis::picks::rolling_monthly_picks;
use crate::analysis::ranking::{rank_universe, RankedList};
use crate::analysis::returns::build_return_series;
use crate::domain::contract::MAX_TOP_LEN;
use crate::domain::recommendation::{MonthlyPickSet, RecommendationBundle};
use crate::domain::series::{PricePoint, PriceSeries, ReturnSeries};
use crate::error::AnalysisError;

/// Everything derived from one universe in one run.
#[derive(Debug, Clone)]
pub struct UniverseAnalysis {
    pub metrics: Vec<InstrumentMetrics>,
    pub ranked: RankedList,
    pub monthly_picks: MonthlyPickSet,
}

/// Analyze one universe of raw monthly price points.
///
/// Per-instrument failures are isolated: a malformed or too-short series
/// drops that instrument with a warning and the rest of the universe
/// proceeds. The only run-level failures are an empty metrics table and a
/// history shorter than the rolling window.
pub fn analyze_universe(
    universe: &[(String, Vec<PricePoint>)],
    cfg: &AnalysisConfig,
) -> anyhow::Result<UniverseAnalysis> {
    let returns = collect_return_series(universe);

    let metrics = compute_metrics(&returns, cfg);
    if metrics.is_empty() {
        return Err(AnalysisError::EmptyUniverse.into());
    }

    let ranked = rank_universe(&metrics, &cfg.weights);
    let monthly_picks = rolling_monthly_picks(&returns, &ranked, cfg)?;

    Ok(UniverseAnalysis {
        metrics,
        ranked,
        monthly_picks,
    })
}

/// Validate each raw series and derive its return series, dropping
/// instruments that fail either step. Input order is preserved.
fn collect_return_series(universe: &[(String, Vec<PricePoint>)]) -> Vec<(String, ReturnSeries)> {
    let mut out = Vec::with_capacity(universe.len());

    for (id, points) in universe {
        let prices = match PriceSeries::try_new(points.clone()) {
            Ok(series) => series,
            Err(err) => {
                tracing::warn!(instrument = %id, error = %err, "dropping instrument: bad price series");
                continue;
            }
        };

        match build_return_series(&prices) {
            Ok(series) => out.push((id.clone(), series)),
            Err(err) => {
                tracing::warn!(instrument = %id, error = %err, "dropping instrument: no return series");
            }
        }
    }

    out
}

/// Merge the per-universe analyses into the output bundle: top-10 of each
/// overall ranking plus both monthly pick sets.
pub fn build_recommendations(
    stocks: &UniverseAnalysis,
    funds: &UniverseAnalysis,
) -> RecommendationBundle {
    RecommendationBundle {
        top_stocks: stocks.ranked.top_ids(MAX_TOP_LEN),
        top_mutual_funds: funds.ranked.top_ids(MAX_TOP_LEN),
        monthly_stock_picks: stocks.monthly_picks.clone(),
        monthly_mf_picks: funds.monthly_picks.clone(),
    }
}

/// One full run over both universes.
pub fn run_analysis(
    stocks: &[(String, Vec<PricePoint>)],
    funds: &[(String, Vec<PricePoint>)],
    cfg: &AnalysisConfig,
) -> anyhow::Result<RecommendationBundle> {
    let stock_analysis = analyze_universe(stocks, cfg)?;
    let fund_analysis = analyze_universe(funds, cfg)?;
    Ok(build_recommendations(&stock_analysis, &fund_analysis))
}
