// src/lib.rs

pub mod config;
pub mod services;
pub mod models;
pub mod handlers;
pub mod routes;

use anyhow::Result;
use std::sync::Arc;

use config::{DashboardConfig, SourceConfig};
use services::csv_source::CsvRowSource;
use services::sheets::{SheetsConfig, SheetsStore};
use services::source::RowSource;

/// Build the row source named by the configuration.
pub fn row_source(config: &DashboardConfig) -> Result<Arc<dyn RowSource>> {
    let source: Arc<dyn RowSource> = match &config.source {
        SourceConfig::Sheets { spreadsheet_id, service_account_json_path } => {
            Arc::new(SheetsStore::new(SheetsConfig {
                spreadsheet_id: spreadsheet_id.clone(),
                service_account_json_path: service_account_json_path.clone(),
            })?)
        }
        SourceConfig::Csv { dir } => Arc::new(CsvRowSource::new(dir)),
    };
    Ok(source)
}
