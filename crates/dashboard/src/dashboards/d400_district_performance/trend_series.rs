//! Monthly records to chart points.
//!
//! Records arrive newest-first and may contain several entries for the same
//! month. The output is ascending by time with one point per month; when a
//! month repeats, the record that appears later in the input wins.

use chrono::{DateTime, Utc};
use contracts::dashboards::d400_district_performance::MonthlyMetricRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::config::TrendConfig;

/// One point on the trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Unique, ascending time axis key
    pub time_key: DateTime<Utc>,
    /// "<month>/<year>"
    pub label: String,
    pub year: i32,
    pub month: u32,
    /// Raw performance index
    pub performance: Option<f64>,
    /// Job days in `job_days_unit`s, rounded
    pub job_days_k: f64,
    /// Unscaled job days for detail display
    pub job_days: f64,
    pub households: u64,
    /// `None` when no wage field is present in the record
    pub wages: Option<f64>,
}

/// A named accessor for one of the wage fields used by upstream feeds
pub struct WageField {
    pub name: &'static str,
    pub get: fn(&MonthlyMetricRecord) -> Option<f64>,
}

fn wages(record: &MonthlyMetricRecord) -> Option<f64> {
    record.wages
}

fn wages_disbursed(record: &MonthlyMetricRecord) -> Option<f64> {
    record.wages_disbursed
}

fn wages_disbursed_rs(record: &MonthlyMetricRecord) -> Option<f64> {
    record.wages_disbursed_rs
}

/// Wage fields in priority order
pub const WAGE_FIELDS: &[WageField] = &[
    WageField {
        name: "wages",
        get: wages,
    },
    WageField {
        name: "wages_disbursed",
        get: wages_disbursed,
    },
    WageField {
        name: "wages_disbursed_rs",
        get: wages_disbursed_rs,
    },
];

/// First wage value present in `WAGE_FIELDS` order
pub fn resolve_wages(record: &MonthlyMetricRecord) -> Option<f64> {
    WAGE_FIELDS.iter().find_map(|field| (field.get)(record))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeriesBuilder {
    job_days_unit: f64,
    max_points: Option<usize>,
}

impl Default for TrendSeriesBuilder {
    fn default() -> Self {
        Self {
            job_days_unit: 1000.0,
            max_points: None,
        }
    }
}

impl From<&TrendConfig> for TrendSeriesBuilder {
    fn from(config: &TrendConfig) -> Self {
        Self {
            job_days_unit: config.job_days_unit,
            max_points: config.max_points,
        }
    }
}

impl TrendSeriesBuilder {
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = Some(max_points);
        self
    }

    pub fn build(&self, records: &[MonthlyMetricRecord]) -> Vec<ChartPoint> {
        // Keyed by month start; later inserts replace earlier ones.
        let mut months: BTreeMap<DateTime<Utc>, &MonthlyMetricRecord> = BTreeMap::new();

        for record in records {
            let Some(month_start) = record.period_start() else {
                tracing::warn!(
                    "skipping record for {} with invalid period {}-{}",
                    record.district_id,
                    record.year,
                    record.month
                );
                continue;
            };
            if months.insert(month_start, record).is_some() {
                tracing::debug!(
                    "duplicate record for {} {}, keeping the later one",
                    record.district_id,
                    record.period_label()
                );
            }
        }

        let mut points: Vec<ChartPoint> = months
            .into_iter()
            .map(|(month_start, record)| self.to_point(month_start, record))
            .collect();

        if let Some(max) = self.max_points {
            let excess = points.len().saturating_sub(max);
            points.drain(..excess);
        }

        points
    }

    fn to_point(&self, month_start: DateTime<Utc>, record: &MonthlyMetricRecord) -> ChartPoint {
        let time_key = match record.timestamp {
            Some(ts) if record.timestamp_matches_period() => ts,
            Some(ts) => {
                tracing::warn!(
                    "timestamp {} of {} does not match period {}, using month start",
                    ts.to_rfc3339(),
                    record.district_id,
                    record.period_label()
                );
                month_start
            }
            None => month_start,
        };

        ChartPoint {
            time_key,
            label: record.period_label(),
            year: record.year,
            month: record.month,
            performance: record.performance_index,
            job_days_k: (record.total_job_days / self.job_days_unit).round(),
            job_days: record.total_job_days,
            households: record.households_covered,
            wages: resolve_wages(record),
        }
    }
}

/// Build with default settings (thousands, no window)
pub fn build_trend_series(records: &[MonthlyMetricRecord]) -> Vec<ChartPoint> {
    TrendSeriesBuilder::default().build(records)
}
