use serde_json::Value;
use std::fmt;

/// Review-service failure with enough context to debug the exchange.
/// Travels inside `anyhow::Error`; recover with `downcast_ref`.
#[derive(Debug, Clone)]
pub struct ReviewDiagnosticsError {
    pub stage: &'static str,
    pub detail: String,
    pub raw_response: Option<Value>,
}

impl fmt::Display for ReviewDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "review error (stage={}): {}", self.stage, self.detail)
    }
}

impl std::error::Error for ReviewDiagnosticsError {}
