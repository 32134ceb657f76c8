use crate::domain::recommendation::{MonthlyPickSet, RecommendationBundle};
use crate::time::month::Month;
use anyhow::ensure;
use std::collections::BTreeSet;

/// Downstream review logic refuses bundles whose top lists carry fewer
/// entries than this.
pub const MIN_APPROVABLE_TOP_LEN: usize = 5;

/// Top lists never exceed this many entries.
pub const MAX_TOP_LEN: usize = 10;

/// Validate a bundle against the review/persistence contract before it is
/// handed off: both top lists within [MIN_APPROVABLE_TOP_LEN, MAX_TOP_LEN],
/// ids non-empty and unique per list, pick-set labels parseable as
/// `YYYY-MM`, and no pick list longer than `top_n`.
pub fn validate_approvable(bundle: &RecommendationBundle, top_n: usize) -> anyhow::Result<()> {
    validate_top_list("top_stocks", &bundle.top_stocks)?;
    validate_top_list("top_mutual_funds", &bundle.top_mutual_funds)?;
    validate_pick_set("monthly_stock_picks", &bundle.monthly_stock_picks, top_n)?;
    validate_pick_set("monthly_mf_picks", &bundle.monthly_mf_picks, top_n)?;
    Ok(())
}

fn validate_top_list(field: &str, ids: &[String]) -> anyhow::Result<()> {
    ensure!(
        ids.len() >= MIN_APPROVABLE_TOP_LEN,
        "{field} must have at least {MIN_APPROVABLE_TOP_LEN} entries to be approvable (got {})",
        ids.len()
    );
    ensure!(
        ids.len() <= MAX_TOP_LEN,
        "{field} must have at most {MAX_TOP_LEN} entries (got {})",
        ids.len()
    );

    let mut seen = BTreeSet::new();
    for id in ids {
        ensure!(!id.trim().is_empty(), "{field} contains an empty id");
        ensure!(seen.insert(id.as_str()), "{field} contains duplicate id {id:?}");
    }

    Ok(())
}

fn validate_pick_set(field: &str, picks: &MonthlyPickSet, top_n: usize) -> anyhow::Result<()> {
    ensure!(!picks.is_empty(), "{field} must not be empty");

    for (label, ids) in picks {
        Month::parse_label(label)
            .map_err(|err| err.context(format!("{field} has an invalid period label {label:?}")))?;
        ensure!(
            ids.len() <= top_n,
            "{field}[{label}] has {} picks, more than top_n={top_n}",
            ids.len()
        );

        let mut seen = BTreeSet::new();
        for id in ids {
            ensure!(!id.trim().is_empty(), "{field}[{label}] contains an empty id");
            ensure!(
                seen.insert(id.as_str()),
                "{field}[{label}] contains duplicate id {id:?}"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}{i}")).collect()
    }

    fn valid_bundle() -> RecommendationBundle {
        RecommendationBundle {
            top_stocks: ids("S", 10),
            top_mutual_funds: ids("F", 5),
            monthly_stock_picks: MonthlyPickSet::from([
                ("2025-11".to_string(), ids("S", 5)),
                ("2025-12".to_string(), ids("S", 3)),
            ]),
            monthly_mf_picks: MonthlyPickSet::from([("2025-12".to_string(), ids("F", 5))]),
        }
    }

    #[test]
    fn accepts_a_valid_bundle() {
        assert!(validate_approvable(&valid_bundle(), 5).is_ok());
    }

    #[test]
    fn rejects_short_top_lists() {
        let mut bundle = valid_bundle();
        bundle.top_mutual_funds = ids("F", 4);
        assert!(validate_approvable(&bundle, 5).is_err());
    }

    #[test]
    fn rejects_oversized_top_lists() {
        let mut bundle = valid_bundle();
        bundle.top_stocks = ids("S", 11);
        assert!(validate_approvable(&bundle, 5).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut bundle = valid_bundle();
        bundle.top_stocks[1] = bundle.top_stocks[0].clone();
        assert!(validate_approvable(&bundle, 5).is_err());
    }

    #[test]
    fn rejects_bad_period_labels() {
        let mut bundle = valid_bundle();
        bundle
            .monthly_stock_picks
            .insert("december".to_string(), ids("S", 2));
        assert!(validate_approvable(&bundle, 5).is_err());
    }

    #[test]
    fn rejects_pick_lists_longer_than_top_n() {
        let bundle = valid_bundle();
        assert!(validate_approvable(&bundle, 2).is_err());
    }
}
