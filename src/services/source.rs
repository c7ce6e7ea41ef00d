// src/services/source.rs
use anyhow::Result;
use async_trait::async_trait;

use crate::models::RawRow;

/// Anything that can hand back a sheet's rows, header first.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// `range` is A1 notation without the sheet name (e.g. `A1:J`); `None`
    /// reads the whole sheet.
    async fn read_rows(&self, sheet: &str, range: Option<&str>) -> Result<Vec<RawRow>>;
}
