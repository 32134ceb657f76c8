use std::fmt;

/// Typed failure kinds raised by the analytics pipeline.
///
/// These travel inside `anyhow::Error`; callers that need to react to a
/// specific kind recover it with `err.downcast_ref::<AnalysisError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// An instrument or the universe lacks enough periods for the
    /// requested computation.
    InsufficientData {
        what: &'static str,
        needed: usize,
        got: usize,
    },
    /// A ratio denominator was zero. Reported per instrument and surfaced
    /// as a null metric value, never a run failure.
    UndefinedRatio {
        ratio: &'static str,
        instrument: String,
    },
    /// Non-monotonic months or invalid values in an input series.
    MalformedSeries { detail: String },
    /// No instrument survived to the metrics table.
    EmptyUniverse,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData { what, needed, got } => {
                write!(f, "insufficient data for {what}: need {needed} periods, got {got}")
            }
            Self::UndefinedRatio { ratio, instrument } => {
                write!(f, "{ratio} is undefined for {instrument}: zero denominator")
            }
            Self::MalformedSeries { detail } => write!(f, "malformed series: {detail}"),
            Self::EmptyUniverse => write!(f, "no instrument survived the analysis"),
        }
    }
}

impl std::error::Error for AnalysisError {}
