// src/services/csv_source.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::ReaderBuilder;
use log::info;
use std::path::PathBuf;

use crate::models::RawRow;
use super::source::RowSource;

/// Reads `<dir>/<sheet>.csv` exports. Ranges are ignored; the whole file is read.
pub struct CsvRowSource {
    dir: PathBuf,
}

impl CsvRowSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CsvRowSource { dir: dir.into() }
    }

    pub fn read_sheet(&self, sheet: &str) -> Result<Vec<RawRow>> {
        let path = self.dir.join(format!("{}.csv", sheet));
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.with_context(|| format!("Failed to read record in {}", path.display()))?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }
        info!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}

#[async_trait]
impl RowSource for CsvRowSource {
    async fn read_rows(&self, sheet: &str, _range: Option<&str>) -> Result<Vec<RawRow>> {
        self.read_sheet(sheet)
    }
}
