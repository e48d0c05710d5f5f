use async_trait::async_trait;
use contracts::dashboards::d400_district_performance::{
    District, DistrictComparison, DistrictDetail, MonthlyMetricRecord, StateSummary,
};
use contracts::enums::PerformanceCategory;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use super::classifier::{score_or_missing, PerformanceThresholds};
use super::trend_series::resolve_wages;

/// Number of months returned in a district's trend
pub const TREND_MONTHS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("District not found: {0}")]
    NotFound(String),

    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Read-only data collaborator of the dashboard.
///
/// Futures are not `Send`: the dashboard runs on a single thread.
#[async_trait(?Send)]
pub trait DashboardSource {
    /// District directory, in display order
    async fn list_districts(&self) -> Result<Vec<District>, SourceError>;

    async fn get_district_detail(&self, district_id: &str) -> Result<DistrictDetail, SourceError>;

    async fn get_state_summary(&self) -> Result<StateSummary, SourceError>;

    /// Latest metrics of every district, for map colouring
    async fn get_comparison(&self) -> Result<Vec<DistrictComparison>, SourceError>;
}

/// Serves the dashboard from records held in memory
#[derive(Debug, Clone)]
pub struct InMemorySource {
    districts: Vec<District>,
    records: Vec<MonthlyMetricRecord>,
    thresholds: PerformanceThresholds,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    districts: Vec<District>,
    #[serde(default)]
    metrics: Vec<MonthlyMetricRecord>,
}

impl InMemorySource {
    pub fn new(districts: Vec<District>, records: Vec<MonthlyMetricRecord>) -> Self {
        Self {
            districts,
            records,
            thresholds: PerformanceThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: PerformanceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Parse `{"districts": [...], "metrics": [...]}`
    pub fn from_fixture_json(json: &str) -> Result<Self, SourceError> {
        let fixture: Fixture =
            serde_json::from_str(json).map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(Self::new(fixture.districts, fixture.metrics))
    }

    /// A district's records, newest first
    fn history(&self, district_id: &str) -> Vec<&MonthlyMetricRecord> {
        let mut history: Vec<&MonthlyMetricRecord> = self
            .records
            .iter()
            .filter(|r| r.district_id == district_id)
            .collect();
        history.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
        history
    }

    /// Latest record of each district that has one, in directory order
    fn latest_per_district(&self) -> Vec<(&District, &MonthlyMetricRecord)> {
        let mut latest: HashMap<&str, &MonthlyMetricRecord> = HashMap::new();
        for record in &self.records {
            let newer = latest
                .get(record.district_id.as_str())
                .map(|cur| (record.year, record.month) > (cur.year, cur.month))
                .unwrap_or(true);
            if newer {
                latest.insert(record.district_id.as_str(), record);
            }
        }

        self.districts
            .iter()
            .filter_map(|d| latest.get(d.id.as_str()).map(|r| (d, *r)))
            .collect()
    }

    fn find_district(&self, district_id: &str) -> Result<&District, SourceError> {
        self.districts
            .iter()
            .find(|d| d.id == district_id)
            .ok_or_else(|| SourceError::NotFound(district_id.to_string()))
    }

    pub fn detail(&self, district_id: &str) -> Result<DistrictDetail, SourceError> {
        let district = self.find_district(district_id)?.clone();
        let history = self.history(district_id);
        let latest = history.first().map(|r| (*r).clone());

        let seed = match &latest {
            Some(record) => self.thresholds.classify(score_or_missing(record.performance_index)),
            None => PerformanceCategory::Mid,
        };

        Ok(DistrictDetail {
            district,
            latest_metrics: latest,
            performance_category_seed: Some(seed),
            trend: history
                .into_iter()
                .take(TREND_MONTHS)
                .cloned()
                .collect(),
        })
    }

    pub fn state_summary(&self) -> StateSummary {
        let latest = self.latest_per_district();
        let mut summary = StateSummary::default();
        if latest.is_empty() {
            return summary;
        }

        let mut best: Option<(&str, f64)> = None;
        let mut worst: Option<(&str, f64)> = None;
        let mut score_sum = 0.0;

        for (district, record) in &latest {
            let score = score_or_missing(record.performance_index);
            summary.total_job_days += record.total_job_days;
            summary.total_households += record.households_covered;
            summary.total_wages += resolve_wages(record).unwrap_or(0.0);
            score_sum += score;

            // Strict comparisons: ties go to the earlier district
            if best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((district.id.as_str(), score));
            }
            if worst.map(|(_, s)| score < s).unwrap_or(true) {
                worst = Some((district.id.as_str(), score));
            }
        }

        let avg = score_sum / latest.len() as f64;
        summary.avg_performance = (avg * 100.0).round() / 100.0;
        summary.best_district = best.map(|(id, _)| id.to_string());
        summary.worst_district = worst.map(|(id, _)| id.to_string());
        summary
    }

    pub fn comparison(&self) -> Vec<DistrictComparison> {
        self.latest_per_district()
            .into_iter()
            .map(|(district, record)| DistrictComparison {
                district_id: district.id.clone(),
                name_en: district.name_en.clone(),
                name_kn: district.name_kn.clone(),
                performance_index: score_or_missing(record.performance_index),
                total_job_days: record.total_job_days,
                households_covered: record.households_covered,
            })
            .collect()
    }
}

#[async_trait(?Send)]
impl DashboardSource for InMemorySource {
    async fn list_districts(&self) -> Result<Vec<District>, SourceError> {
        Ok(self.districts.clone())
    }

    async fn get_district_detail(&self, district_id: &str) -> Result<DistrictDetail, SourceError> {
        self.detail(district_id)
    }

    async fn get_state_summary(&self) -> Result<StateSummary, SourceError> {
        Ok(self.state_summary())
    }

    async fn get_comparison(&self) -> Result<Vec<DistrictComparison>, SourceError> {
        Ok(self.comparison())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(district_id: &str, year: i32, month: u32, score: f64, job_days: f64) -> MonthlyMetricRecord {
        let mut r = MonthlyMetricRecord::new(district_id, year, month);
        r.performance_index = Some(score);
        r.total_job_days = job_days;
        r.households_covered = 100;
        r.wages = Some(job_days * 200.0);
        r
    }

    fn source() -> InMemorySource {
        let districts = vec![
            District::new("D1", "One", "ಒಂದು", "Coffee"),
            District::new("D2", "Two", "ಎರಡು", "Silk"),
            District::new("D3", "Three", "ಮೂರು", "Forts"),
        ];
        let mut records = vec![
            metric("D1", 2024, 1, 70.0, 1000.0),
            metric("D1", 2024, 2, 95.0, 2000.0),
            metric("D2", 2023, 12, 60.0, 500.0),
            metric("D2", 2024, 2, 80.0, 3000.0),
        ];
        for month in 1..=8 {
            records.push(metric("D3", 2023, month, 50.0, 10.0));
        }
        InMemorySource::new(districts, records)
    }

    #[test]
    fn test_detail_latest_and_trend() {
        let detail = source().detail("D1").unwrap();
        let latest = detail.latest_metrics.unwrap();
        assert_eq!((latest.year, latest.month), (2024, 2));
        assert_eq!(detail.performance_category_seed, Some(PerformanceCategory::High));
        let periods: Vec<(i32, u32)> = detail.trend.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(periods, vec![(2024, 2), (2024, 1)]);
    }

    #[test]
    fn test_detail_trend_limited_to_six_months() {
        let detail = source().detail("D3").unwrap();
        assert_eq!(detail.trend.len(), TREND_MONTHS);
        assert_eq!(detail.trend[0].month, 8);
    }

    #[test]
    fn test_unknown_district_detail() {
        assert_eq!(
            source().detail("D9"),
            Err(SourceError::NotFound("D9".to_string()))
        );
    }

    #[test]
    fn test_district_without_metrics() {
        let src = InMemorySource::new(vec![District::new("D1", "One", "ಒಂದು", "x")], vec![]);
        let detail = src.detail("D1").unwrap();
        assert!(detail.latest_metrics.is_none());
        assert_eq!(detail.performance_category_seed, Some(PerformanceCategory::Mid));
        assert_eq!(src.state_summary(), StateSummary::default());
    }

    #[test]
    fn test_state_summary_uses_latest_month() {
        let summary = source().state_summary();
        assert_eq!(summary.total_job_days, 2000.0 + 3000.0 + 10.0);
        assert_eq!(summary.total_households, 300);
        assert_eq!(summary.total_wages, (2000.0 + 3000.0 + 10.0) * 200.0);
        assert_eq!(summary.avg_performance, 75.0);
        assert_eq!(summary.best_district.as_deref(), Some("D1"));
        assert_eq!(summary.worst_district.as_deref(), Some("D3"));
    }

    #[test]
    fn test_comparison_in_directory_order() {
        let comparison = source().comparison();
        let ids: Vec<&str> = comparison.iter().map(|c| c.district_id.as_str()).collect();
        assert_eq!(ids, vec!["D1", "D2", "D3"]);
        assert_eq!(comparison[1].performance_index, 80.0);
    }

    #[test]
    fn test_fixture_json() {
        let json = r#"{
            "districts": [{"id": "KA01", "name_en": "Bagalkot", "name_kn": "ಬಾಗಲಕೋಟೆ", "feature": "Red soil"}],
            "metrics": [{"district_id": "KA01", "year": 2024, "month": 4, "total_job_days": 100, "households_covered": 5, "wages_paid": 20000, "performance_index": 91}]
        }"#;
        let src = InMemorySource::from_fixture_json(json).unwrap();
        let detail = src.detail("KA01").unwrap();
        assert_eq!(detail.latest_metrics.unwrap().wages, Some(20000.0));

        assert!(matches!(
            InMemorySource::from_fixture_json("{"),
            Err(SourceError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_trait_methods() {
        let src = source();
        let dashboard: &dyn DashboardSource = &src;
        assert_eq!(dashboard.list_districts().await.unwrap().len(), 3);
        assert!(dashboard.get_district_detail("D2").await.is_ok());
        assert_eq!(dashboard.get_comparison().await.unwrap().len(), 3);
        assert_eq!(
            dashboard.get_state_summary().await.unwrap().best_district.as_deref(),
            Some("D1")
        );
    }
}
