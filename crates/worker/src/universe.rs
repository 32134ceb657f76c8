use nivesh_core::domain::instrument::Instrument;

/// NSE large caps tracked by default (Yahoo-style symbols).
const NIFTY50_SYMBOLS: [&str; 50] = [
    "RELIANCE.NS",
    "TCS.NS",
    "HDFCBANK.NS",
    "INFY.NS",
    "HINDUNILVR.NS",
    "ICICIBANK.NS",
    "KOTAKBANK.NS",
    "ITC.NS",
    "SBIN.NS",
    "BAJFINANCE.NS",
    "BHARTIARTL.NS",
    "ASIANPAINT.NS",
    "AXISBANK.NS",
    "MARUTI.NS",
    "TITAN.NS",
    "SUNPHARMA.NS",
    "ULTRACEMCO.NS",
    "BAJAJFINSV.NS",
    "WIPRO.NS",
    "HCLTECH.NS",
    "ADANIENT.NS",
    "TATAMOTORS.NS",
    "POWERGRID.NS",
    "NTPC.NS",
    "TATASTEEL.NS",
    "TECHM.NS",
    "NESTLEIND.NS",
    "GRASIM.NS",
    "JSWSTEEL.NS",
    "ADANIPORTS.NS",
    "INDUSINDBK.NS",
    "ONGC.NS",
    "HINDALCO.NS",
    "DRREDDY.NS",
    "CIPLA.NS",
    "EICHERMOT.NS",
    "DIVISLAB.NS",
    "COALINDIA.NS",
    "SBILIFE.NS",
    "BRITANNIA.NS",
    "HEROMOTOCO.NS",
    "BAJAJ-AUTO.NS",
    "TATACONSUM.NS",
    "APOLLOHOSP.NS",
    "LTIM.NS",
    "UPL.NS",
    "BPCL.NS",
    "HDFCLIFE.NS",
    "M&M.NS",
    "SHREECEM.NS",
];

/// Mutual funds tracked by default (AMFI scheme names).
const MUTUAL_FUND_NAMES: [&str; 21] = [
    "Axis Bluechip Fund",
    "Mirae Asset Large Cap Fund",
    "Parag Parikh Flexi Cap Fund",
    "SBI Small Cap Fund",
    "Kotak Emerging Equity Fund",
    "Axis Midcap Fund",
    "HDFC Mid-Cap Opportunities Fund",
    "Nippon India Small Cap Fund",
    "Canara Robeco Emerging Equities Fund",
    "Tata Digital India Fund",
    "ICICI Prudential Technology Fund",
    "SBI Healthcare Opportunities Fund",
    "Aditya Birla Sun Life Digital India Fund",
    "DSP Healthcare Fund",
    "Kotak Pioneer Fund",
    "Axis ESG Equity Fund",
    "SBI Balanced Advantage Fund",
    "ICICI Prudential Balanced Advantage Fund",
    "Edelweiss Balanced Advantage Fund",
    "Taurus Largecap Equity Fund",
    "Quant Active Fund",
];

#[derive(Debug, Clone)]
pub struct UniverseOptions {
    /// Number of equities to analyze (must be 10..=50).
    pub stocks: usize,

    /// Number of mutual funds to analyze (must be 10..=21).
    pub funds: usize,
}

impl Default for UniverseOptions {
    fn default() -> Self {
        Self {
            stocks: NIFTY50_SYMBOLS.len(),
            funds: MUTUAL_FUND_NAMES.len(),
        }
    }
}

impl UniverseOptions {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("UNIVERSE_STOCKS") {
            if let Ok(n) = s.parse::<usize>() {
                out.stocks = n;
            }
        }

        if let Ok(s) = std::env::var("UNIVERSE_FUNDS") {
            if let Ok(n) = s.parse::<usize>() {
                out.funds = n;
            }
        }

        out
    }
}

/// The two instrument universes for one run, in ranking tie-break order.
pub fn build_universes(opts: &UniverseOptions) -> anyhow::Result<(Vec<Instrument>, Vec<Instrument>)> {
    anyhow::ensure!(
        (10..=NIFTY50_SYMBOLS.len()).contains(&opts.stocks),
        "stock universe size must be 10..={} (got {})",
        NIFTY50_SYMBOLS.len(),
        opts.stocks
    );
    anyhow::ensure!(
        (10..=MUTUAL_FUND_NAMES.len()).contains(&opts.funds),
        "fund universe size must be 10..={} (got {})",
        MUTUAL_FUND_NAMES.len(),
        opts.funds
    );

    let stocks = NIFTY50_SYMBOLS
        .iter()
        .copied()
        .take(opts.stocks)
        .map(Instrument::equity)
        .collect();
    let funds = MUTUAL_FUND_NAMES
        .iter()
        .copied()
        .take(opts.funds)
        .map(Instrument::mutual_fund)
        .collect();

    Ok((stocks, funds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn default_universes_carry_the_full_lists() {
        let (stocks, funds) = build_universes(&UniverseOptions::default()).unwrap();
        assert_eq!(stocks.len(), 50);
        assert_eq!(funds.len(), 21);
    }

    #[test]
    fn ids_are_unique_within_each_universe() {
        let (stocks, funds) = build_universes(&UniverseOptions::default()).unwrap();
        let stock_ids: BTreeSet<&str> = stocks.iter().map(|i| i.id.as_str()).collect();
        let fund_ids: BTreeSet<&str> = funds.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(stock_ids.len(), stocks.len());
        assert_eq!(fund_ids.len(), funds.len());
    }

    #[test]
    fn rejects_undersized_universes() {
        let opts = UniverseOptions { stocks: 3, funds: 21 };
        assert!(build_universes(&opts).is_err());
    }

    #[test]
    fn truncation_keeps_list_order() {
        let opts = UniverseOptions { stocks: 10, funds: 10 };
        let (stocks, _) = build_universes(&opts).unwrap();
        assert_eq!(stocks[0].id, "RELIANCE.NS");
        assert_eq!(stocks.len(), 10);
    }
}
