// src/bin/kpi_snapshot.rs
//
// One refresh cycle: fetch, build, print the snapshot and card values as JSON.
use chrono::Local;
use dotenv::dotenv;
use log::info;
use serde_json::json;

use factory_kpi_dashboard::config::DashboardConfig;
use factory_kpi_dashboard::row_source;
use factory_kpi_dashboard::models::KpiDisplay;
use factory_kpi_dashboard::services::calculations::indent_value;
use factory_kpi_dashboard::services::refresh::SnapshotService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = DashboardConfig::from_env()?;
    let daily_target = config.daily_target;
    let source = row_source(&config)?;
    let service = SnapshotService::new(source, config);

    let snapshot = service.fetch_snapshot().await?;
    let indent = indent_value(Local::now().date_naive(), daily_target);
    info!("Snapshot as of {}", snapshot.as_of_date);

    let output = json!({
        "snapshot": snapshot,
        "display": KpiDisplay::from_snapshot(&snapshot, indent),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
