// src/config.rs
use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::str::FromStr;

use crate::services::columns::ColumnLabels;

pub const DEFAULT_TARGET_SALE: f64 = 199_200_000.0;
pub const DEFAULT_DAILY_TARGET: f64 = 6_670_000.0;

/// Where rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    Sheets {
        spreadsheet_id: String,
        service_account_json_path: String,
    },
    Csv {
        dir: String,
    },
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub dashboard_sheet: String,
    pub sales_report_sheet: String,
    pub dashboard_range: String,
    pub target_sale: f64,
    pub daily_target: f64,
    pub labels: ColumnLabels,
    pub refresh_secs: u64,
    pub port: u16,
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .replace('_', "")
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", name, raw)),
        None => Ok(default),
    }
}

impl DashboardConfig {
    /// Read the process environment (after `dotenv`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let source = match lookup("CSV_DIR") {
            Some(dir) => {
                info!("Reading sheets from CSV exports in {}", dir);
                SourceConfig::Csv { dir }
            }
            None => {
                let spreadsheet_id = lookup("GOOGLE_SHEETS_ID");
                let service_account_json_path = lookup("SERVICE_ACCOUNT_JSON");
                match (spreadsheet_id, service_account_json_path) {
                    (Some(spreadsheet_id), Some(service_account_json_path)) => SourceConfig::Sheets {
                        spreadsheet_id,
                        service_account_json_path,
                    },
                    _ => bail!("Set CSV_DIR, or both GOOGLE_SHEETS_ID and SERVICE_ACCOUNT_JSON"),
                }
            }
        };

        let labels = match lookup("COLUMN_LABELS_JSON") {
            Some(path) => ColumnLabels::from_json_file(&path)?,
            None => ColumnLabels::default(),
        };

        let target_sale = parse_or(&lookup, "TARGET_SALE", DEFAULT_TARGET_SALE)?;
        if target_sale == 0.0 {
            warn!("TARGET_SALE is 0, achieved % will always be 0");
        }

        Ok(DashboardConfig {
            source,
            dashboard_sheet: lookup("DASHBOARD_SHEET").unwrap_or_else(|| "Dashboard".to_string()),
            sales_report_sheet: lookup("SALES_REPORT_SHEET").unwrap_or_else(|| "Sales Report".to_string()),
            dashboard_range: lookup("DASHBOARD_RANGE").unwrap_or_else(|| "A1:J".to_string()),
            target_sale,
            daily_target: parse_or(&lookup, "DAILY_TARGET", DEFAULT_DAILY_TARGET)?,
            labels,
            refresh_secs: parse_or(&lookup, "REFRESH_SECS", 300)?,
            port: parse_or(&lookup, "PORT", 3030)?,
        })
    }
}
