//! ViewModel for the district performance dashboard

use contracts::dashboards::d400_district_performance::{
    District, DistrictComparison, DistrictDetail, StateSummary,
};
use contracts::enums::{Language, PerformanceCategory};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

use super::classifier::{score_or_missing, PerformanceThresholds, MISSING_SCORE};
use super::geo::{coordinates_for, LatLon, STATE_CENTER};
use super::selection::{
    DetailRequest, SelectionChange, SelectionCoordinator, SelectionError, SubscriptionId,
};
use super::source::{DashboardSource, SourceError};
use super::trend_series::{resolve_wages, ChartPoint, TrendSeriesBuilder};
use crate::shared::config::DashboardConfig;
use crate::shared::number_format::{
    format_currency, format_magnitude, format_optional, format_optional_currency, format_percent,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("Unknown district: {0}")]
    UnknownDistrict(String),

    #[error("Failed to load details for {district_id}: {source}")]
    DetailFetchFailed {
        district_id: String,
        #[source]
        source: SourceError,
    },

    #[error("Failed to load district directory: {0}")]
    DirectoryFetchFailed(#[source] SourceError),

    #[error("Failed to load state summary: {0}")]
    SummaryFetchFailed(#[source] SourceError),

    #[error("Failed to load district comparison: {0}")]
    ComparisonFetchFailed(#[source] SourceError),
}

impl From<SelectionError> for DashboardError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::UnknownDistrict(id) => DashboardError::UnknownDistrict(id),
        }
    }
}

/// What happened to a detail response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    /// Shown in the detail panel and trend chart
    Applied,
    /// A newer selection was made while the fetch was in flight; dropped
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub district_id: String,
    pub label: String,
    pub coordinates: LatLon,
    pub score: f64,
    pub category: PerformanceCategory,
    pub selected: bool,
    pub radius: u32,
}

/// Formatted headline numbers of the selected district
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSet {
    pub job_days: String,
    pub target_job_days: String,
    pub households: String,
    pub wages: String,
    pub performance: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub district_id: String,
    pub name: String,
    pub feature: String,
    pub score: f64,
    pub category: PerformanceCategory,
    /// `None` when the district has no metrics yet
    pub kpis: Option<KpiSet>,
    pub trend: Vec<ChartPoint>,
    /// False while the panel still shows the previous district
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateOverview {
    pub total_job_days: String,
    pub total_households: String,
    pub total_wages: String,
    pub avg_performance: String,
    pub trend_up: bool,
    pub best_district: Option<String>,
    pub worst_district: Option<String>,
}

#[derive(Default)]
struct ViewState {
    language: Language,
    summary: Option<StateSummary>,
    comparison: Vec<DistrictComparison>,
    detail: Option<DistrictDetail>,
    trend: Vec<ChartPoint>,
    last_error: Option<DashboardError>,
}

struct Inner {
    source: Rc<dyn DashboardSource>,
    config: DashboardConfig,
    thresholds: PerformanceThresholds,
    trend_builder: TrendSeriesBuilder,
    coordinator: SelectionCoordinator,
    view: RefCell<ViewState>,
}

/// Composition root of the dashboard.
///
/// Cheap to clone; clones share state. No `RefCell` borrow is held across an
/// `.await`, so subscribers and concurrent fetches may read the view model
/// at any time.
#[derive(Clone)]
pub struct DashboardViewModel {
    inner: Rc<Inner>,
}

impl DashboardViewModel {
    pub fn new(source: Rc<dyn DashboardSource>, config: DashboardConfig) -> Self {
        let thresholds = PerformanceThresholds::from(&config.performance);
        let trend_builder = TrendSeriesBuilder::from(&config.trend);
        Self {
            inner: Rc::new(Inner {
                source,
                config,
                thresholds,
                trend_builder,
                coordinator: SelectionCoordinator::new(),
                view: RefCell::new(ViewState::default()),
            }),
        }
    }

    /// Initial load: directory, state summary and comparison in parallel,
    /// then the detail of the auto-selected first district.
    pub async fn load(&self) -> Result<Option<DetailOutcome>, DashboardError> {
        let source = self.inner.source.clone();
        let (districts, summary, comparison) = futures::join!(
            source.list_districts(),
            source.get_state_summary(),
            source.get_comparison()
        );

        match summary {
            Ok(summary) => self.inner.view.borrow_mut().summary = Some(summary),
            Err(e) => self.report(DashboardError::SummaryFetchFailed(e)),
        }
        match comparison {
            Ok(comparison) => self.inner.view.borrow_mut().comparison = comparison,
            Err(e) => self.report(DashboardError::ComparisonFetchFailed(e)),
        }

        let districts = districts.map_err(|e| {
            let err = DashboardError::DirectoryFetchFailed(e);
            self.report(err.clone());
            err
        })?;

        match self.inner.coordinator.load_directory(districts) {
            Some(request) => self.fetch_detail(request).await.map(Some),
            None => Ok(None),
        }
    }

    /// Select a district. Takes effect and notifies subscribers before this
    /// returns; the detail fetch is started separately with [`Self::fetch_detail`].
    pub fn select_district(&self, district_id: &str) -> Result<DetailRequest, DashboardError> {
        self.inner
            .coordinator
            .select_district(district_id)
            .map_err(|e| {
                let err = DashboardError::from(e);
                self.report(err.clone());
                err
            })
    }

    /// Fetch the detail for `request` and show it if the request is still the
    /// latest one when the response arrives.
    ///
    /// On failure the previously shown detail stays in place.
    pub async fn fetch_detail(&self, request: DetailRequest) -> Result<DetailOutcome, DashboardError> {
        let result = self
            .inner
            .source
            .get_district_detail(&request.district_id)
            .await;

        if !self.inner.coordinator.is_current(&request) {
            tracing::warn!(
                "discarding stale detail for {} (request {})",
                request.district_id,
                request.request_id
            );
            return Ok(DetailOutcome::Stale);
        }

        let detail = result.and_then(|detail| {
            if detail.district.id == request.district_id {
                Ok(detail)
            } else {
                Err(SourceError::Malformed(format!(
                    "requested {}, received {}",
                    request.district_id, detail.district.id
                )))
            }
        });

        match detail {
            Ok(detail) => {
                let trend = self.inner.trend_builder.build(&detail.trend);
                if let Some(seed) = detail.performance_category_seed {
                    let derived = self.classify_latest(&detail);
                    if seed != derived {
                        tracing::debug!(
                            "source category {:?} for {} differs from derived {:?}",
                            seed,
                            request.district_id,
                            derived
                        );
                    }
                }
                tracing::debug!(
                    "detail for {} applied ({} trend points)",
                    request.district_id,
                    trend.len()
                );
                let mut view = self.inner.view.borrow_mut();
                view.detail = Some(detail);
                view.trend = trend;
                view.last_error = None;
                Ok(DetailOutcome::Applied)
            }
            Err(source) => {
                let err = DashboardError::DetailFetchFailed {
                    district_id: request.district_id.clone(),
                    source,
                };
                self.report(err.clone());
                Err(err)
            }
        }
    }

    pub async fn select_and_load(&self, district_id: &str) -> Result<DetailOutcome, DashboardError> {
        let request = self.select_district(district_id)?;
        self.fetch_detail(request).await
    }

    pub fn subscribe(&self, subscriber: impl FnMut(&SelectionChange) + 'static) -> SubscriptionId {
        self.inner.coordinator.subscribe(subscriber)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.coordinator.unsubscribe(id)
    }

    pub fn current_selection(&self) -> Option<String> {
        self.inner.coordinator.current_selection()
    }

    pub fn districts(&self) -> Vec<District> {
        self.inner.coordinator.districts()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    // ---------------------------------------------------------------------
    // Language
    // ---------------------------------------------------------------------

    pub fn language(&self) -> Language {
        self.inner.view.borrow().language
    }

    pub fn set_language(&self, language: Language) {
        self.inner.view.borrow_mut().language = language;
    }

    pub fn toggle_language(&self) -> Language {
        let mut view = self.inner.view.borrow_mut();
        view.language = view.language.toggled();
        view.language
    }

    // ---------------------------------------------------------------------
    // Derived views
    // ---------------------------------------------------------------------

    pub fn selector_options(&self) -> Vec<SelectorOption> {
        let language = self.language();
        let current = self.current_selection();
        self.districts()
            .into_iter()
            .map(|d| SelectorOption {
                selected: current.as_deref() == Some(d.id.as_str()),
                label: d.display_name(language).to_string(),
                id: d.id,
            })
            .collect()
    }

    /// One marker per district; districts missing from the comparison data
    /// are scored as `MISSING_SCORE`.
    pub fn map_markers(&self) -> Vec<MapMarker> {
        let view = self.inner.view.borrow();
        let current = self.current_selection();
        let map = &self.inner.config.map;

        self.districts()
            .into_iter()
            .map(|d| {
                let score = view
                    .comparison
                    .iter()
                    .find(|c| c.district_id == d.id)
                    .map(|c| c.performance_index)
                    .unwrap_or(MISSING_SCORE);
                let selected = current.as_deref() == Some(d.id.as_str());
                MapMarker {
                    label: d.display_name(view.language).to_string(),
                    coordinates: coordinates_for(&d.id),
                    score,
                    category: self.inner.thresholds.classify(score),
                    selected,
                    radius: if selected {
                        map.selected_radius
                    } else {
                        map.default_radius
                    },
                    district_id: d.id,
                }
            })
            .collect()
    }

    pub fn map_center(&self) -> LatLon {
        self.current_selection()
            .map(|id| coordinates_for(&id))
            .unwrap_or(STATE_CENTER)
    }

    pub fn detail_panel(&self) -> Option<DetailPanel> {
        let view = self.inner.view.borrow();
        let detail = view.detail.as_ref()?;
        let district = &detail.district;
        let latest = detail.latest_metrics.as_ref();

        let score = score_or_missing(latest.and_then(|m| m.performance_index));
        let kpis = latest.map(|m| KpiSet {
            job_days: format_magnitude(m.total_job_days),
            target_job_days: format_optional(m.target_job_days),
            households: format_magnitude(m.households_covered as f64),
            wages: format_optional_currency(resolve_wages(m)),
            performance: format_percent(score),
        });

        Some(DetailPanel {
            district_id: district.id.clone(),
            name: district.display_name(view.language).to_string(),
            feature: district.feature.clone(),
            score,
            category: self.classify_latest(detail),
            kpis,
            trend: view.trend.clone(),
            is_current: self.current_selection().as_deref() == Some(district.id.as_str()),
        })
    }

    pub fn trend(&self) -> Vec<ChartPoint> {
        self.inner.view.borrow().trend.clone()
    }

    pub fn state_overview(&self) -> Option<StateOverview> {
        let view = self.inner.view.borrow();
        let summary = view.summary.as_ref()?;
        let name_of = |id: &Option<String>| {
            id.as_ref().map(|id| {
                self.inner
                    .coordinator
                    .district(id)
                    .map(|d| d.display_name(view.language).to_string())
                    .unwrap_or_else(|| id.clone())
            })
        };

        Some(StateOverview {
            total_job_days: format_magnitude(summary.total_job_days),
            total_households: format_magnitude(summary.total_households as f64),
            total_wages: format_currency(summary.total_wages),
            avg_performance: format_percent(summary.avg_performance),
            trend_up: summary.avg_performance >= self.inner.config.overview.trend_up_threshold,
            best_district: name_of(&summary.best_district),
            worst_district: name_of(&summary.worst_district),
        })
    }

    pub fn last_error(&self) -> Option<DashboardError> {
        self.inner.view.borrow().last_error.clone()
    }

    fn classify_latest(&self, detail: &DistrictDetail) -> PerformanceCategory {
        let score = detail
            .latest_metrics
            .as_ref()
            .and_then(|m| m.performance_index);
        self.inner.thresholds.classify(score_or_missing(score))
    }

    fn report(&self, err: DashboardError) {
        tracing::warn!("{err}");
        self.inner.view.borrow_mut().last_error = Some(err);
    }
}
