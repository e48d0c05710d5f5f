use serde::{Deserialize, Serialize};

/// Ordinal performance badge of a district.
///
/// Variants are declared low-to-high so the derived `Ord` follows the badge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceCategory {
    Low,
    #[serde(alias = "medium")]
    Mid,
    High,
}

impl PerformanceCategory {
    pub fn code(&self) -> &'static str {
        match self {
            PerformanceCategory::Low => "low",
            PerformanceCategory::Mid => "mid",
            PerformanceCategory::High => "high",
        }
    }

    /// Marker colour used by map views (green / amber / red)
    pub fn color(&self) -> &'static str {
        match self {
            PerformanceCategory::High => "#10b981",
            PerformanceCategory::Mid => "#f59e0b",
            PerformanceCategory::Low => "#ef4444",
        }
    }
}
