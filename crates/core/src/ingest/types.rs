use crate::domain::series::PricePoint;
use crate::time::month::Month;
use serde::{Deserialize, Serialize};

/// Monthly price/NAV history for one instrument as delivered by a market
/// data provider. `adjusted` carries the designated adjusted value: close
/// price for equities, NAV for funds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryResponse {
    pub instrument_id: String,
    pub quotes: Vec<MonthlyQuote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyQuote {
    pub month: Month,
    pub adjusted: f64,
}

impl PriceHistoryResponse {
    pub fn into_price_points(self) -> Vec<PricePoint> {
        self.quotes
            .into_iter()
            .map(|q| PricePoint {
                month: q.month,
                value: q.adjusted,
            })
            .collect()
    }
}
