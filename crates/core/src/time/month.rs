use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month. Every series in the engine is keyed by one of these;
/// the serialized form is the period label `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> anyhow::Result<Self> {
        anyhow::ensure!(
            (1..=12).contains(&month),
            "month must be 1..=12 (got {month})"
        );
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn parse_label(s: &str) -> anyhow::Result<Self> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .with_context(|| format!("month label must be YYYY-MM (got {s:?})"))?;
        let year: i32 = year
            .parse()
            .with_context(|| format!("invalid year in month label {s:?}"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("invalid month in month label {s:?}"))?;
        Self::new(year, month)
    }

    /// The `count` months ending at `self`, ascending.
    pub fn trailing(&self, count: usize) -> Vec<Self> {
        let mut out = Vec::with_capacity(count);
        let mut cur = *self;
        for _ in 0..count {
            out.push(cur);
            cur = cur.prev();
        }
        out.reverse();
        out
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<String> for Month {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_label(&s)
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.label()
    }
}

/// Resolve the analysis as-of month: an explicit `YYYY-MM` argument wins,
/// otherwise the last completed calendar month relative to `now_utc` (the
/// current month has no close yet).
pub fn resolve_as_of_month(
    as_of_month_arg: Option<&str>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<Month> {
    if let Some(s) = as_of_month_arg {
        return Month::parse_label(s);
    }

    Ok(Month::from_date(now_utc.date_naive()).prev())
}
