use crate::domain::instrument::{Instrument, InstrumentCategory};
use crate::ingest::provider::MarketDataProvider;
use crate::ingest::types::{MonthlyQuote, PriceHistoryResponse};
use crate::time::month::Month;
use anyhow::Result;

/// Offline market data: a deterministic monthly random walk seeded from
/// the instrument id, so repeated runs and tests see identical histories.
/// Equities drift about 1% a month from a 100..1000 base; fund NAVs drift
/// about 0.8% from a 10..100 base.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedMarketData;

const EQUITY_DRIFT: f64 = 0.01;
const EQUITY_SPREAD: f64 = 0.05;
const FUND_DRIFT: f64 = 0.008;
const FUND_SPREAD: f64 = 0.03;

impl SimulatedMarketData {
    fn history(&self, instrument: &Instrument, as_of: Month, months: u32) -> PriceHistoryResponse {
        let mut state = seed(&instrument.id);

        let (drift, spread, base_lo, base_hi) = match instrument.category {
            InstrumentCategory::Equity => (EQUITY_DRIFT, EQUITY_SPREAD, 100.0, 1000.0),
            InstrumentCategory::MutualFund => (FUND_DRIFT, FUND_SPREAD, 10.0, 100.0),
        };

        let mut value = base_lo + unit(&mut state) * (base_hi - base_lo);
        let mut quotes = Vec::with_capacity(months as usize);

        for month in as_of.trailing(months as usize) {
            // Centered pseudo-noise in [-spread, spread) around the drift.
            let noise = (unit(&mut state) * 2.0 - 1.0) * spread;
            value *= 1.0 + drift + noise;
            quotes.push(MonthlyQuote {
                month,
                adjusted: value,
            });
        }

        PriceHistoryResponse {
            instrument_id: instrument.id.clone(),
            quotes,
        }
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for SimulatedMarketData {
    fn provider_name(&self) -> &'static str {
        "simulated"
    }

    async fn fetch_monthly_history(
        &self,
        instrument: &Instrument,
        as_of: Month,
        months: u32,
    ) -> Result<PriceHistoryResponse> {
        Ok(self.history(instrument, as_of, months))
    }
}

fn seed(id: &str) -> u64 {
    // FNV-1a over the id bytes; any stable byte mix works here.
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in id.bytes() {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x1000_0000_01b3);
    }
    hash
}

fn unit(state: &mut u64) -> f64 {
    // One LCG step, mapped to [0, 1).
    *state = state
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407);
    (*state >> 11) as f64 / (1u64 << 53) as f64
}
