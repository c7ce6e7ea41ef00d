// src/services/pipeline.rs
//
// Raw rows in, KpiSnapshot out. No I/O and no retained state: the caller owns
// fetching, the refresh loop, and keeping the last good snapshot around.
use log::info;
use thiserror::Error;

use crate::models::{KpiSnapshot, RawRow};
use super::calculations::aggregate;
use super::columns::{resolve_columns, ColumnLabels};
use super::daily::build_series;
use super::trends::resolve_trends;

/// Structural failures. Cell-level noise never shows up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("required column '{field}' not found in sheet header")]
    MissingColumn { field: &'static str },
    #[error("no dated rows available")]
    EmptySeries,
}

/// Run the whole pipeline on one fetch.
///
/// `primary_rows` is the Dashboard sheet including its header row.
/// `secondary_rows` is the Sales Report (header included), or `None` when it
/// could not be read.
pub fn build_snapshot(
    primary_rows: &[RawRow],
    secondary_rows: Option<&[RawRow]>,
    labels: &ColumnLabels,
    target_sale: f64,
) -> Result<KpiSnapshot, PipelineError> {
    let (header, data) = primary_rows.split_first().ok_or(PipelineError::EmptySeries)?;
    let columns = resolve_columns(header, labels)?;
    let daily = build_series(data, &columns)?;
    let trends = resolve_trends(secondary_rows, &daily);
    let snapshot = aggregate(&daily, trends, target_sale)?;

    info!(
        "Built KPI snapshot as of {} ({} daily records, achieved {}%)",
        snapshot.as_of_date,
        daily.len(),
        snapshot.achieved_pct
    );
    Ok(snapshot)
}
