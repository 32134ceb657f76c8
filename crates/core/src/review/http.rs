use crate::config::Settings;
use crate::domain::recommendation::RecommendationBundle;
use crate::review::error::ReviewDiagnosticsError;
use crate::review::{ReviewService, ReviewVerdict};
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PATH: &str = "/api/analysis/review";

#[derive(Debug, Clone)]
pub struct HttpReviewClient {
    http: reqwest::Client,
    base_url: String,
    path: String,
}

/// What the review endpoint answers with. `recommendations` may echo an
/// edited bundle back; the caller currently only acts on the verdict.
#[derive(Debug, Deserialize)]
struct ReviewResponse {
    approved: bool,
    feedback: Option<String>,
}

impl HttpReviewClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.require_review_base_url()?.to_string();

        let timeout_secs = std::env::var("REVIEW_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let path = std::env::var("REVIEW_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build review http client")?;

        Ok(Self {
            http,
            base_url,
            path,
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
}

#[async_trait::async_trait]
impl ReviewService for HttpReviewClient {
    fn service_name(&self) -> &'static str {
        "external_http_review"
    }

    async fn submit_bundle(&self, bundle: &RecommendationBundle) -> anyhow::Result<ReviewVerdict> {
        let res = self
            .http
            .post(self.url())
            .json(&serde_json::json!({ "recommendations": bundle }))
            .send()
            .await
            .context("review request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read review response body")?;

        if !status.is_success() {
            return Err(ReviewDiagnosticsError {
                stage: "http",
                detail: format!("status={status}"),
                raw_response: serde_json::from_str(&text).ok(),
            }
            .into());
        }

        let parsed = serde_json::from_str::<ReviewResponse>(&text).map_err(|err| {
            ReviewDiagnosticsError {
                stage: "decode",
                detail: format!("invalid review response: {err}"),
                raw_response: serde_json::from_str(&text).ok(),
            }
        })?;

        Ok(ReviewVerdict {
            approved: parsed.approved,
            feedback: parsed.feedback,
        })
    }
}
