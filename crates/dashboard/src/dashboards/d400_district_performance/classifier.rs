use contracts::enums::PerformanceCategory;
use serde::{Deserialize, Serialize};

use crate::shared::config::PerformanceConfig;

pub const HIGH_THRESHOLD: f64 = 90.0;
pub const MID_THRESHOLD: f64 = 75.0;

/// Score assumed when a district has no reported performance index.
/// Applied by callers before classifying; the classifier only takes numbers.
pub const MISSING_SCORE: f64 = 0.0;

/// Inclusive lower bounds of the `High` and `Mid` badges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceThresholds {
    pub high: f64,
    pub mid: f64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            high: HIGH_THRESHOLD,
            mid: MID_THRESHOLD,
        }
    }
}

impl From<&PerformanceConfig> for PerformanceThresholds {
    fn from(config: &PerformanceConfig) -> Self {
        Self {
            high: config.high_threshold,
            mid: config.mid_threshold,
        }
    }
}

impl PerformanceThresholds {
    /// NaN compares false against both bounds and lands in `Low`.
    pub fn classify(&self, score: f64) -> PerformanceCategory {
        if score >= self.high {
            PerformanceCategory::High
        } else if score >= self.mid {
            PerformanceCategory::Mid
        } else {
            PerformanceCategory::Low
        }
    }
}

/// Classify with the default 90 / 75 boundaries
pub fn classify(score: f64) -> PerformanceCategory {
    PerformanceThresholds::default().classify(score)
}

pub fn score_or_missing(score: Option<f64>) -> f64 {
    score.unwrap_or(MISSING_SCORE)
}
