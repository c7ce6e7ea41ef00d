// src/bin/test_sheets.rs
use dotenv::dotenv;
use log::{error, info};

use factory_kpi_dashboard::config::DashboardConfig;
use factory_kpi_dashboard::row_source;
use factory_kpi_dashboard::services::columns::resolve_columns;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    info!("Testing sheet connectivity and header resolution...");

    let config = DashboardConfig::from_env()?;
    let source = row_source(&config)?;

    match source.read_rows(&config.dashboard_sheet, Some(&config.dashboard_range)).await {
        Ok(rows) => {
            info!("✓ Read {} rows from {}", rows.len(), config.dashboard_sheet);
            match rows.first() {
                Some(header) => match resolve_columns(header, &config.labels) {
                    Ok(map) => info!("✓ Header resolved: {:?}", map),
                    Err(e) => error!("✗ Header problem: {}", e),
                },
                None => error!("✗ {} is empty", config.dashboard_sheet),
            }
        }
        Err(e) => error!("✗ Failed to read {}: {:#}", config.dashboard_sheet, e),
    }

    match source.read_rows(&config.sales_report_sheet, None).await {
        Ok(rows) => info!("✓ Read {} rows from {}", rows.len(), config.sales_report_sheet),
        Err(e) => error!("✗ Failed to read {}: {:#}", config.sales_report_sheet, e),
    }

    Ok(())
}
