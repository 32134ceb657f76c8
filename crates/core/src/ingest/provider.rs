use crate::config::Settings;
use crate::domain::instrument::Instrument;
use crate::ingest::types::PriceHistoryResponse;
use crate::time::month::Month;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PATH: &str = "/v1/monthly_history";
const DEFAULT_RETRIES: u32 = 3;

/// The data-acquisition collaborator. The engine never fetches anything
/// itself; a provider hands it monthly histories and the worker wires the
/// two together.
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_monthly_history(
        &self,
        instrument: &Instrument,
        as_of: Month,
        months: u32,
    ) -> Result<PriceHistoryResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpJsonMarketData {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    path: String,
    retries: u32,
}

impl HttpJsonMarketData {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_market_data_base_url()?.to_string();
        let api_key = settings.market_data_api_key.clone();

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("MARKET_DATA_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        let path = std::env::var("MARKET_DATA_HISTORY_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build market data http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            path,
            retries,
        })
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn fetch_once(
        &self,
        instrument: &Instrument,
        as_of: Month,
        months: u32,
    ) -> Result<PriceHistoryResponse> {
        let url = self.url();
        let headers = self.headers()?;

        let res = self
            .http
            .get(url)
            .headers(headers)
            .query(&[
                ("instrument_id", instrument.id.clone()),
                ("category", instrument.category.as_str().to_string()),
                ("as_of_month", as_of.label()),
                ("months", months.to_string()),
            ])
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;

        if !status.is_success() {
            anyhow::bail!("market data HTTP {status}: {text}");
        }

        serde_json::from_str::<PriceHistoryResponse>(&text)
            .with_context(|| format!("failed to parse market data response: {text}"))
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for HttpJsonMarketData {
    fn provider_name(&self) -> &'static str {
        "external_http_json"
    }

    async fn fetch_monthly_history(
        &self,
        instrument: &Instrument,
        as_of: Month,
        months: u32,
    ) -> Result<PriceHistoryResponse> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let res = self.fetch_once(instrument, as_of, months).await;
            match res {
                Ok(parsed) => {
                    validate_history(&parsed, instrument, as_of)?;
                    return Ok(parsed);
                }
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(
                        instrument = %instrument.id,
                        attempt,
                        ?backoff,
                        error = %err,
                        "market data fetch failed; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// Enforce the input contract on a provider response: the instrument id
/// echoes back, months are strictly increasing, no quote is later than the
/// as-of month, and every value is a finite positive number.
fn validate_history(
    resp: &PriceHistoryResponse,
    instrument: &Instrument,
    as_of: Month,
) -> Result<()> {
    anyhow::ensure!(
        resp.instrument_id == instrument.id,
        "provider instrument mismatch: expected {:?}, got {:?}",
        instrument.id,
        resp.instrument_id
    );
    anyhow::ensure!(!resp.quotes.is_empty(), "provider returned no quotes");

    for w in resp.quotes.windows(2) {
        anyhow::ensure!(
            w[1].month > w[0].month,
            "quote months must be strictly increasing ({} then {})",
            w[0].month,
            w[1].month
        );
    }

    for q in &resp.quotes {
        anyhow::ensure!(
            q.month <= as_of,
            "quote for {} is after the as-of month {as_of}",
            q.month
        );
        anyhow::ensure!(
            q.adjusted.is_finite() && q.adjusted > 0.0,
            "invalid adjusted value {} at {}",
            q.adjusted,
            q.month
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::MonthlyQuote;
    use serde_json::json;

    fn response(months: &[(&str, f64)]) -> PriceHistoryResponse {
        PriceHistoryResponse {
            instrument_id: "RELIANCE.NS".to_string(),
            quotes: months
                .iter()
                .map(|(label, adjusted)| MonthlyQuote {
                    month: Month::parse_label(label).unwrap(),
                    adjusted: *adjusted,
                })
                .collect(),
        }
    }

    #[test]
    fn parses_the_expected_wire_shape() {
        let v = json!({
            "instrument_id": "RELIANCE.NS",
            "quotes": [
                {"month": "2025-11", "adjusted": 2850.5},
                {"month": "2025-12", "adjusted": 2901.0}
            ]
        });

        let parsed: PriceHistoryResponse = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.instrument_id, "RELIANCE.NS");
        assert_eq!(parsed.quotes.len(), 2);
        assert_eq!(parsed.quotes[0].month, Month::new(2025, 11).unwrap());
        assert_eq!(parsed.quotes[1].adjusted, 2901.0);
    }

    #[test]
    fn validation_accepts_a_clean_history() {
        let resp = response(&[("2025-11", 2850.5), ("2025-12", 2901.0)]);
        let instrument = Instrument::equity("RELIANCE.NS");
        assert!(validate_history(&resp, &instrument, Month::new(2025, 12).unwrap()).is_ok());
    }

    #[test]
    fn validation_rejects_out_of_order_months() {
        let resp = response(&[("2025-12", 2901.0), ("2025-11", 2850.5)]);
        let instrument = Instrument::equity("RELIANCE.NS");
        assert!(validate_history(&resp, &instrument, Month::new(2025, 12).unwrap()).is_err());
    }

    #[test]
    fn validation_rejects_quotes_after_the_as_of_month() {
        let resp = response(&[("2025-12", 2901.0)]);
        let instrument = Instrument::equity("RELIANCE.NS");
        assert!(validate_history(&resp, &instrument, Month::new(2025, 11).unwrap()).is_err());
    }

    #[test]
    fn validation_rejects_mismatched_instrument() {
        let resp = response(&[("2025-12", 2901.0)]);
        let instrument = Instrument::equity("TCS.NS");
        assert!(validate_history(&resp, &instrument, Month::new(2025, 12).unwrap()).is_err());
    }

    #[test]
    fn validation_rejects_non_positive_values() {
        let resp = response(&[("2025-12", 0.0)]);
        let instrument = Instrument::equity("RELIANCE.NS");
        assert!(validate_history(&resp, &instrument, Month::new(2025, 12).unwrap()).is_err());
    }
}
