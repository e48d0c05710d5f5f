use anyhow::Context;
use contracts::enums::Language;
use dashboard::dashboards::d400_district_performance::{
    mock_data, DashboardSource, DashboardViewModel, InMemorySource, PerformanceThresholds,
};
use dashboard::shared::config::load_config;
use dashboard::shared::number_format::NO_DATA;
use std::rc::Rc;

/// Usage: `dashboard [fixture.json|-] [district_id] [en|kn]`
///
/// Without a fixture (or with `-`) the dashboard runs on generated demo data.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("dashboard.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = load_config().context("Failed to load dashboard configuration")?;
    let thresholds = PerformanceThresholds::from(&config.performance);

    let mut args = std::env::args().skip(1);
    let source = match args.next().filter(|path| path != "-") {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read fixture {path}"))?;
            InMemorySource::from_fixture_json(&json)
                .with_context(|| format!("Failed to parse fixture {path}"))?
        }
        None => {
            let districts = mock_data::karnataka_districts();
            let metrics =
                mock_data::generate_recent_metrics(&districts, config.mock.months, config.mock.seed);
            tracing::info!(
                "generated {} demo records (seed {})",
                metrics.len(),
                config.mock.seed
            );
            InMemorySource::new(districts, metrics)
        }
    };
    let source: Rc<dyn DashboardSource> = Rc::new(source.with_thresholds(thresholds));

    let view_model = DashboardViewModel::new(source, config);
    view_model.subscribe(|change| {
        tracing::info!(
            "selected {} at ({:.4}, {:.4})",
            change.district_id,
            change.coordinates.lat,
            change.coordinates.lon
        );
    });

    view_model.load().await?;
    if let Some(district_id) = args.next() {
        view_model.select_and_load(&district_id).await?;
    }
    if let Some(code) = args.next() {
        let language = Language::from_code(&code)
            .with_context(|| format!("Unknown language code {code}, expected en or kn"))?;
        view_model.set_language(language);
    }

    print_dashboard(&view_model);
    view_model.toggle_language();
    print_dashboard(&view_model);

    Ok(())
}

fn print_dashboard(view_model: &DashboardViewModel) {
    let language = view_model.language();
    println!("== {} == (switch: {})", language.code(), language.toggle_label());

    if let Some(overview) = view_model.state_overview() {
        println!(
            "Karnataka: {} job days, {} households, {} wages, avg {} {}",
            overview.total_job_days,
            overview.total_households,
            overview.total_wages,
            overview.avg_performance,
            if overview.trend_up { "↑" } else { "↓" }
        );
        println!(
            "best: {}  worst: {}",
            overview.best_district.unwrap_or_default(),
            overview.worst_district.unwrap_or_default()
        );
    }

    let Some(panel) = view_model.detail_panel() else {
        println!("no district selected");
        return;
    };

    println!(
        "{} ({}) [{}] {}",
        panel.name,
        panel.feature,
        panel.category.code(),
        panel.category.color()
    );
    if let Some(kpis) = &panel.kpis {
        println!(
            "job days {} / target {}, households {}, wages {}, performance {}",
            kpis.job_days, kpis.target_job_days, kpis.households, kpis.wages, kpis.performance
        );
    }
    for point in &panel.trend {
        println!(
            "  {:>7}  {:>5}K job days  perf {}",
            point.label,
            point.job_days_k,
            point
                .performance
                .map(|p| format!("{p:.1}"))
                .unwrap_or_else(|| NO_DATA.to_string())
        );
    }
}
