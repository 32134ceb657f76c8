use serde::{Deserialize, Serialize};

/// One tradable instrument. The id is the key used across every series,
/// metrics table and pick list; nothing else about an instrument is
/// mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: String,
    pub category: InstrumentCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentCategory {
    Equity,
    MutualFund,
}

impl InstrumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::MutualFund => "mutual_fund",
        }
    }
}

impl Instrument {
    pub fn equity(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: InstrumentCategory::Equity,
        }
    }

    pub fn mutual_fund(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: InstrumentCategory::MutualFund,
        }
    }
}
