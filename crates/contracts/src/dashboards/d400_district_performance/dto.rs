use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Language, PerformanceCategory};

/// Administrative district of the monitored state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    /// Stable key, e.g. "KA01"
    pub id: String,
    pub name_en: String,
    pub name_kn: String,
    /// Free-text "famous for" tag
    pub feature: String,
}

impl District {
    pub fn new(id: &str, name_en: &str, name_kn: &str, feature: &str) -> Self {
        Self {
            id: id.to_string(),
            name_en: name_en.to_string(),
            name_kn: name_kn.to_string(),
            feature: feature.to_string(),
        }
    }

    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::English => &self.name_en,
            Language::Kannada => &self.name_kn,
        }
    }
}

/// One month of program metrics for a single district.
///
/// Wage totals arrive under different field names depending on the feed,
/// so all three are optional here and resolved by the trend builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetricRecord {
    pub district_id: String,
    pub year: i32,
    /// 1..=12
    pub month: u32,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_job_days: f64,
    #[serde(default)]
    pub target_job_days: Option<f64>,
    #[serde(default)]
    pub households_covered: u64,
    #[serde(default, alias = "wages_paid")]
    pub wages: Option<f64>,
    #[serde(default)]
    pub wages_disbursed: Option<f64>,
    #[serde(default)]
    pub wages_disbursed_rs: Option<f64>,
    /// 0..100 performance index
    #[serde(default)]
    pub performance_index: Option<f64>,
}

impl MonthlyMetricRecord {
    /// Minimal record for a period; metric fields are zero/empty
    pub fn new(district_id: &str, year: i32, month: u32) -> Self {
        Self {
            district_id: district_id.to_string(),
            year,
            month,
            timestamp: None,
            total_job_days: 0.0,
            target_job_days: None,
            households_covered: 0,
            wages: None,
            wages_disbursed: None,
            wages_disbursed_rs: None,
            performance_index: None,
        }
    }

    /// First day of the record's month at midnight UTC.
    /// `None` when year/month do not form a valid date.
    pub fn period_start(&self) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(self.year, self.month, 1, 0, 0, 0).single()
    }

    /// True when the explicit timestamp falls into the record's (year, month)
    pub fn timestamp_matches_period(&self) -> bool {
        match self.timestamp {
            Some(ts) => ts.year() == self.year && ts.month() == self.month,
            None => true,
        }
    }

    /// Short axis label, e.g. "3/2024"
    pub fn period_label(&self) -> String {
        format!("{}/{}", self.month, self.year)
    }
}

/// Detail payload for the selected district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictDetail {
    pub district: District,
    #[serde(default)]
    pub latest_metrics: Option<MonthlyMetricRecord>,
    /// Category as computed by the data source. Informational only:
    /// consumers re-derive the category from `latest_metrics`.
    #[serde(default, rename = "performance_category")]
    pub performance_category_seed: Option<PerformanceCategory>,
    /// Monthly records, typically newest first
    #[serde(default)]
    pub trend: Vec<MonthlyMetricRecord>,
}

/// State-wide aggregate over each district's latest month
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateSummary {
    pub total_job_days: f64,
    pub total_households: u64,
    pub total_wages: f64,
    pub avg_performance: f64,
    #[serde(default)]
    pub best_district: Option<String>,
    #[serde(default)]
    pub worst_district: Option<String>,
}

/// Latest metrics of one district, used to colour map markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictComparison {
    pub district_id: String,
    pub name_en: String,
    pub name_kn: String,
    pub performance_index: f64,
    pub total_job_days: f64,
    pub households_covered: u64,
}
