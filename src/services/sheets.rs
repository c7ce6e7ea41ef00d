// src/services/sheets.rs

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::models::RawRow;
use super::google_oauth::{fetch_access_token, ServiceAccountKey, SHEETS_READONLY_SCOPE};
use super::source::RowSource;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub service_account_json_path: String,
}

/// Reads sheet values through the Google Sheets v4 API.
pub struct SheetsStore {
    pub config: SheetsConfig,
    client: Client,
    key: ServiceAccountKey,
}

impl SheetsStore {
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let key = ServiceAccountKey::from_file(&config.service_account_json_path)?;
        Ok(SheetsStore {
            config,
            client: Client::new(),
            key,
        })
    }

    fn values_url(&self, a1_range: &str) -> Result<Url> {
        let mut url = Url::parse(SHEETS_API_BASE)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Sheets API base URL cannot take path segments"))?
            .push(&self.config.spreadsheet_id)
            .push("values")
            .push(a1_range);
        Ok(url)
    }
}

/// `'Sales Report'!A1:J`, or just the quoted sheet name for the whole sheet.
pub fn a1_range(sheet: &str, range: Option<&str>) -> String {
    let quoted = format!("'{}'", sheet.replace('\'', "''"));
    match range {
        Some(r) => format!("{}!{}", quoted, r),
        None => quoted,
    }
}

/// Turn a `values` response body into rows of text cells.
pub fn rows_from_values(response: &Value) -> Vec<RawRow> {
    let Some(values) = response["values"].as_array() else {
        return Vec::new();
    };
    values
        .iter()
        .map(|row| {
            row.as_array()
                .map(|cells| {
                    cells
                        .iter()
                        .map(|v| match v {
                            Value::String(s) => s.clone(),
                            Value::Null => String::new(),
                            other => other.to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect()
}

#[async_trait]
impl RowSource for SheetsStore {
    async fn read_rows(&self, sheet: &str, range: Option<&str>) -> Result<Vec<RawRow>> {
        let token = fetch_access_token(&self.client, &self.key, SHEETS_READONLY_SCOPE).await?;
        let a1 = a1_range(sheet, range);
        let url = self.values_url(&a1)?;
        debug!("Fetching {}", url);

        let response: Value = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Sheets API rejected read of {}", a1))?
            .json()
            .await?;

        let rows = rows_from_values(&response);
        info!("Read {} rows from {}", rows.len(), a1);
        Ok(rows)
    }
}
