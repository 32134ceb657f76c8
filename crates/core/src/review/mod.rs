pub mod error;
pub mod http;

use crate::domain::recommendation::RecommendationBundle;
use serde::{Deserialize, Serialize};

/// Outcome of an external review of a recommendation bundle. A rejection
/// is an ordinary outcome, not an error: the caller decides what to do
/// with an unapproved bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewVerdict {
    pub approved: bool,
    pub feedback: Option<String>,
}

/// The review/approval collaborator. The engine produces bundles; whether
/// one goes live is someone else's call.
#[async_trait::async_trait]
pub trait ReviewService: Send + Sync {
    fn service_name(&self) -> &'static str;

    async fn submit_bundle(&self, bundle: &RecommendationBundle) -> anyhow::Result<ReviewVerdict>;
}
