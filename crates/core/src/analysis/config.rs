use crate::analysis::ranking::Weights;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.03;
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 12;
pub const DEFAULT_WINDOW: usize = 3;
pub const DEFAULT_TOP_N: usize = 5;

/// The configuration surface consumed by the analytics pipeline. One value
/// per run; the engine itself never reads the environment.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub weights: Weights,
    pub risk_free_rate: f64,
    pub periods_per_year: u32,
    /// Trailing months per rolling pick window.
    pub window: usize,
    /// Picks per period.
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            window: DEFAULT_WINDOW,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("ANALYSIS_RISK_FREE_RATE") {
            if let Ok(n) = s.parse::<f64>() {
                if n.is_finite() {
                    out.risk_free_rate = n;
                }
            }
        }

        if let Ok(s) = std::env::var("ANALYSIS_PERIODS_PER_YEAR") {
            if let Ok(n) = s.parse::<u32>() {
                if n >= 1 {
                    out.periods_per_year = n;
                }
            }
        }

        if let Ok(s) = std::env::var("ANALYSIS_WINDOW") {
            if let Ok(n) = s.parse::<usize>() {
                if n >= 1 {
                    out.window = n;
                }
            }
        }

        if let Ok(s) = std::env::var("ANALYSIS_TOP_N") {
            if let Ok(n) = s.parse::<usize>() {
                if n >= 1 {
                    out.top_n = n;
                }
            }
        }

        out
    }
}
