use crate::analysis::config::AnalysisConfig;
use crate::analysis::ranking::RankedList;
use crate::domain::recommendation::MonthlyPickSet;
use crate::domain::series::ReturnSeries;
use crate::error::AnalysisError;
use crate::time::month::Month;
use anyhow::ensure;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Short-window momentum picks per period.
///
/// For every month with a full trailing window, instruments are ordered by
/// windowed cumulative return, filtered to the top half of the overall
/// ranking, and capped at `top_n`. One synthetic entry labeled with the
/// month after the last observed one is appended, computed from the most
/// recent window — a forward pick with no realized outcome yet.
pub fn rolling_monthly_picks(
    returns: &[(String, ReturnSeries)],
    ranked: &RankedList,
    cfg: &AnalysisConfig,
) -> anyhow::Result<MonthlyPickSet> {
    ensure!(cfg.window >= 1, "window must be at least 1 period");
    ensure!(cfg.top_n >= 1, "top_n must be at least 1");

    let months: Vec<Month> = returns
        .iter()
        .flat_map(|(_, series)| series.months())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if months.len() < cfg.window {
        return Err(AnalysisError::InsufficientData {
            what: "rolling pick window",
            needed: cfg.window,
            got: months.len(),
        }
        .into());
    }

    let top_half = ranked.top_half_ids();
    let mut picks = MonthlyPickSet::new();

    for i in (cfg.window - 1)..months.len() {
        let window = &months[i + 1 - cfg.window..=i];
        picks.insert(
            months[i].label(),
            window_picks(window, returns, &top_half, cfg.top_n),
        );
    }

    // Forward pick for the month after the last observation, from the most
    // recent window.
    let last = months[months.len() - 1];
    let recent = &months[months.len() - cfg.window..];
    picks.insert(
        last.next().label(),
        window_picks(recent, returns, &top_half, cfg.top_n),
    );

    Ok(picks)
}

/// Rank one window: cumulative `Π(1+r) - 1` per instrument over the
/// returns it has inside the window. Instruments with no observation in
/// the window are excluded; partial coverage is scored over what exists.
fn window_picks(
    window: &[Month],
    returns: &[(String, ReturnSeries)],
    top_half: &BTreeSet<&str>,
    top_n: usize,
) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = Vec::with_capacity(returns.len());

    for (id, series) in returns {
        let mut growth = 1.0f64;
        let mut observed = false;
        for month in window {
            if let Some(r) = series.value_for(*month) {
                growth *= 1.0 + r;
                observed = true;
            }
        }
        if observed {
            scored.push((growth - 1.0, id.as_str()));
        }
    }

    // Stable sort: ties keep universe input order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .filter(|(_, id)| top_half.contains(id))
        .take(top_n)
        .map(|(_, id)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metrics::compute_metrics;
    use crate::analysis::ranking::rank_universe;
    use crate::domain::series::ReturnPoint;

    fn return_series(start: Month, values: &[f64]) -> ReturnSeries {
        let mut month = start;
        let mut points = Vec::with_capacity(values.len());
        for &value in values {
            points.push(ReturnPoint { month, value });
            month = month.next();
        }
        ReturnSeries::try_new(points).unwrap()
    }

    fn universe(rows: &[(&str, &[f64])]) -> Vec<(String, ReturnSeries)> {
        let start = Month::new(2025, 1).unwrap();
        rows.iter()
            .map(|(id, values)| (id.to_string(), return_series(start, values)))
            .collect()
    }

    fn ranked_for(returns: &[(String, ReturnSeries)], cfg: &AnalysisConfig) -> RankedList {
        rank_universe(&compute_metrics(returns, cfg), &cfg.weights)
    }

    #[test]
    fn three_periods_yield_one_realized_and_one_synthetic_pick() {
        let cfg = AnalysisConfig::default();
        let returns = universe(&[
            ("A", &[0.05, 0.04, 0.03]),
            ("B", &[0.01, 0.01, 0.01]),
            ("C", &[-0.02, -0.01, 0.00]),
            ("D", &[-0.05, -0.04, -0.03]),
        ]);
        let ranked = ranked_for(&returns, &cfg);

        let picks = rolling_monthly_picks(&returns, &ranked, &cfg).unwrap();
        assert_eq!(picks.len(), 2);
        // Both entries come from the same 3-month window.
        let realized = picks.get("2025-03").unwrap();
        let synthetic = picks.get("2025-04").unwrap();
        assert_eq!(realized, synthetic);
        assert_eq!(realized[0], "A");
    }

    #[test]
    fn covers_every_period_with_a_full_window() {
        let cfg = AnalysisConfig::default();
        let returns = universe(&[
            ("A", &[0.05, 0.04, 0.03, 0.02, 0.01]),
            ("B", &[0.00, 0.01, 0.02, 0.03, 0.04]),
        ]);
        let ranked = ranked_for(&returns, &cfg);

        let picks = rolling_monthly_picks(&returns, &ranked, &cfg).unwrap();
        let labels: Vec<&str> = picks.keys().map(String::as_str).collect();
        // Months 2025-01..05; full windows end at 03, 04, 05; synthetic 06.
        assert_eq!(labels, vec!["2025-03", "2025-04", "2025-05", "2025-06"]);
    }

    #[test]
    fn fails_when_fewer_periods_than_the_window_exist() {
        let cfg = AnalysisConfig::default();
        let returns = universe(&[("A", &[0.01, 0.02]), ("B", &[0.02, 0.01])]);
        let ranked = ranked_for(&returns, &cfg);

        let err = rolling_monthly_picks(&returns, &ranked, &cfg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::InsufficientData { needed: 3, got: 2, .. })
        ));
    }

    #[test]
    fn never_returns_more_than_top_n() {
        let cfg = AnalysisConfig {
            top_n: 2,
            ..AnalysisConfig::default()
        };
        let rows: Vec<(String, ReturnSeries)> = universe(&[
            ("A", &[0.09, 0.08, 0.07]),
            ("B", &[0.06, 0.05, 0.04]),
            ("C", &[0.03, 0.02, 0.01]),
            ("D", &[0.00, 0.01, 0.02]),
            ("E", &[-0.01, 0.00, 0.01]),
            ("F", &[-0.03, -0.02, -0.01]),
        ]);
        let ranked = ranked_for(&rows, &cfg);

        let picks = rolling_monthly_picks(&rows, &ranked, &cfg).unwrap();
        for (label, ids) in &picks {
            assert!(ids.len() <= 2, "{label} has {} picks", ids.len());
        }
    }

    #[test]
    fn only_top_half_instruments_survive_the_filter() {
        let cfg = AnalysisConfig::default();
        // D has the strongest recent window but ranks in the bottom half
        // overall; it must never appear in a pick list.
        let returns = universe(&[
            ("A", &[0.04, 0.04, 0.04, 0.01, 0.01, 0.01]),
            ("B", &[0.03, 0.03, 0.03, 0.00, 0.00, 0.00]),
            ("C", &[-0.01, -0.01, -0.01, -0.02, -0.02, -0.02]),
            ("D", &[-0.30, -0.30, -0.30, 0.20, 0.20, 0.20]),
        ]);
        let ranked = ranked_for(&returns, &cfg);
        let top_half = ranked.top_half_ids();
        assert!(!top_half.contains("D"));

        let picks = rolling_monthly_picks(&returns, &ranked, &cfg).unwrap();
        for ids in picks.values() {
            assert!(!ids.iter().any(|id| id == "D"));
        }
    }

    #[test]
    fn instruments_without_window_data_are_excluded_for_that_period() {
        let cfg = AnalysisConfig::default();
        let start = Month::new(2025, 1).unwrap();
        let late_start = Month::new(2025, 4).unwrap();
        let returns = vec![
            ("A".to_string(), return_series(start, &[0.01, 0.01, 0.01, 0.01, 0.01, 0.01])),
            ("B".to_string(), return_series(start, &[0.00, 0.00, 0.00, 0.00, 0.00, 0.00])),
            // C only has data from 2025-04 on.
            ("C".to_string(), return_series(late_start, &[0.50, 0.50, 0.50])),
            ("D".to_string(), return_series(start, &[-0.01, -0.01, -0.01, -0.01, -0.01, -0.01])),
        ];
        let ranked = ranked_for(&returns, &cfg);

        let picks = rolling_monthly_picks(&returns, &ranked, &cfg).unwrap();
        // 2025-03 window is 01..03, before C's first observation.
        assert!(!picks.get("2025-03").unwrap().iter().any(|id| id == "C"));
        // By 2025-06 the window is 04..06 and C participates (and leads).
        let june = picks.get("2025-06").unwrap();
        assert!(june.iter().any(|id| id == "C") || !ranked.top_half_ids().contains("C"));
    }

    #[test]
    fn windowed_return_compounds_the_window() {
        let window = [
            Month::new(2025, 1).unwrap(),
            Month::new(2025, 2).unwrap(),
            Month::new(2025, 3).unwrap(),
        ];
        let rows = universe(&[("A", &[0.10, 0.10, 0.10]), ("B", &[0.20, 0.00, 0.00])]);
        let everyone: BTreeSet<&str> = ["A", "B"].into();

        let ids = window_picks(&window, &rows, &everyone, 5);
        // 1.1^3 - 1 = 0.331 beats 0.20.
        assert_eq!(ids, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn fewer_survivors_than_top_n_is_a_shorter_list() {
        let cfg = AnalysisConfig::default();
        let returns = universe(&[
            ("A", &[0.02, 0.02, 0.02]),
            ("B", &[0.01, 0.01, 0.01]),
            ("C", &[0.00, 0.00, 0.00]),
            ("D", &[-0.01, -0.01, -0.01]),
        ]);
        let ranked = ranked_for(&returns, &cfg);

        let picks = rolling_monthly_picks(&returns, &ranked, &cfg).unwrap();
        // Only 4 // 2 == 2 instruments pass the top-half filter.
        for ids in picks.values() {
            assert!(ids.len() <= 2);
            assert!(!ids.is_empty());
        }
    }
}
