use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub trend: TrendConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub overview: OverviewConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

/// Badge boundaries. Lower bounds are inclusive.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PerformanceConfig {
    pub high_threshold: f64,
    pub mid_threshold: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            high_threshold: 90.0,
            mid_threshold: 75.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TrendConfig {
    /// Divisor for the compact job-days axis
    pub job_days_unit: f64,
    /// Keep only the most recent N months; absent means no limit
    #[serde(default)]
    pub max_points: Option<usize>,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            job_days_unit: 1000.0,
            max_points: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MapConfig {
    pub selected_radius: u32,
    pub default_radius: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            selected_radius: 12,
            default_radius: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OverviewConfig {
    /// Average performance at or above which the state KPI shows an upward trend
    pub trend_up_threshold: f64,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            trend_up_threshold: 85.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MockConfig {
    pub seed: u64,
    pub months: u32,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { seed: 42, months: 6 }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[performance]
high_threshold = 90.0
mid_threshold = 75.0

[trend]
job_days_unit = 1000.0

[map]
selected_radius = 12
default_radius = 8

[overview]
trend_up_threshold = 85.0

[mock]
seed = 42
months = 6
"#;

impl DashboardConfig {
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: DashboardConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let perf = &self.performance;
        anyhow::ensure!(
            perf.high_threshold.is_finite() && perf.mid_threshold.is_finite(),
            "performance thresholds must be finite numbers"
        );
        anyhow::ensure!(
            perf.mid_threshold <= perf.high_threshold,
            "mid_threshold ({}) must not exceed high_threshold ({})",
            perf.mid_threshold,
            perf.high_threshold
        );
        anyhow::ensure!(
            self.trend.job_days_unit.is_finite() && self.trend.job_days_unit > 0.0,
            "trend.job_days_unit must be a positive number"
        );
        Ok(())
    }
}

/// Load configuration from dashboard.toml
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<DashboardConfig> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("dashboard.toml");

            if config_path.exists() {
                return load_config_from(&config_path);
            } else {
                tracing::warn!("dashboard.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    DashboardConfig::from_toml(DEFAULT_CONFIG)
}

pub fn load_config_from(path: &Path) -> anyhow::Result<DashboardConfig> {
    tracing::info!("Loading config from: {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    DashboardConfig::from_toml(&contents)
}
