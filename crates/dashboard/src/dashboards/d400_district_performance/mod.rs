//! District performance dashboard: one selected district shared by the map,
//! the selector, the detail panel and the trend chart.

pub mod classifier;
pub mod geo;
pub mod mock_data;
pub mod selection;
pub mod source;
pub mod trend_series;
pub mod view_model;

pub use classifier::{classify, score_or_missing, PerformanceThresholds, MISSING_SCORE};
pub use geo::{coordinates_for, LatLon, STATE_CENTER};
pub use selection::{DetailRequest, SelectionChange, SelectionCoordinator, SelectionError, SubscriptionId};
pub use source::{DashboardSource, InMemorySource, SourceError};
pub use trend_series::{build_trend_series, resolve_wages, ChartPoint, TrendSeriesBuilder};
pub use view_model::{DashboardError, DashboardViewModel, DetailOutcome};
