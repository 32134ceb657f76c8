use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Period label (`YYYY-MM`) → ordered instrument ids picked for that
/// period. The final entry is always the synthetic next-period prediction.
pub type MonthlyPickSet = BTreeMap<String, Vec<String>>;

/// The engine's sole output artifact, produced fresh on each run.
///
/// Field names and list ordering are part of the contract with the
/// review/persistence collaborator; see `domain::contract` for the
/// approvability rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub top_stocks: Vec<String>,
    pub top_mutual_funds: Vec<String>,
    pub monthly_stock_picks: MonthlyPickSet,
    pub monthly_mf_picks: MonthlyPickSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_the_contract_field_names() {
        let bundle = RecommendationBundle {
            top_stocks: vec!["RELIANCE.NS".to_string()],
            top_mutual_funds: vec!["Axis Bluechip Fund".to_string()],
            monthly_stock_picks: MonthlyPickSet::from([(
                "2026-01".to_string(),
                vec!["RELIANCE.NS".to_string()],
            )]),
            monthly_mf_picks: MonthlyPickSet::new(),
        };

        let v = serde_json::to_value(&bundle).unwrap();
        let obj = v.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert!(keys.contains(&"top_stocks"));
        assert!(keys.contains(&"top_mutual_funds"));
        assert!(keys.contains(&"monthly_stock_picks"));
        assert!(keys.contains(&"monthly_mf_picks"));
        assert_eq!(obj.len(), 4);
        assert_eq!(v["monthly_stock_picks"]["2026-01"][0], "RELIANCE.NS");
    }

    #[test]
    fn round_trips_through_json() {
        let bundle = RecommendationBundle {
            top_stocks: vec!["TCS.NS".to_string(), "INFY.NS".to_string()],
            top_mutual_funds: vec![],
            monthly_stock_picks: MonthlyPickSet::new(),
            monthly_mf_picks: MonthlyPickSet::new(),
        };

        let text = serde_json::to_string(&bundle).unwrap();
        let back: RecommendationBundle = serde_json::from_str(&text).unwrap();
        assert_eq!(back, bundle);
    }
}
