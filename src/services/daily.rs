// src/services/daily.rs
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::debug;

use crate::models::{DailyRecord, DailySeries, RawRow};
use super::columns::ColumnMap;
use super::numeric::{parse_number, parse_optional_number};
use super::pipeline::PipelineError;

// Two-digit-year formats go first: chrono's %Y also accepts "25", which
// would read 01-Jan-25 as year 25. %y needs exactly two digits, so four-digit
// years fall through to the %Y formats. Month-first is tried before day-first
// for numeric dates; day-first is only reached when month-first is impossible.
const DATE_FORMATS: &[&str] = &[
    "%d-%b-%y",
    "%d %b %y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m-%d-%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
];

// Anything earlier is a mis-parse, not a real sheet date.
const MIN_YEAR: i32 = 100;

/// Tolerant date parser for hand-typed sheet cells. Time parts are dropped.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let plausible = |date: &NaiveDate| date.year() >= MIN_YEAR;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok().filter(plausible))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok().map(|dt| dt.date()).filter(plausible))
        })
}

pub(crate) fn cell(row: &RawRow, index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn optional_cell(row: &RawRow, index: Option<usize>) -> Option<f64> {
    index.and_then(|i| parse_optional_number(cell(row, i)))
}

fn build_record(row: &RawRow, columns: &ColumnMap) -> Option<DailyRecord> {
    let date = parse_date(cell(row, columns.date))?;
    Some(DailyRecord {
        date,
        today_sale: parse_number(cell(row, columns.today_sale)),
        oee_pct: parse_number(cell(row, columns.oee_pct)),
        plan_vs_actual_pct: parse_number(cell(row, columns.plan_vs_actual_pct)),
        rejection_amount_day: parse_number(cell(row, columns.rejection_amount_day)),
        rejection_pct: parse_number(cell(row, columns.rejection_pct)),
        rejection_amount_cumulative: parse_number(cell(row, columns.rejection_amount_cumulative)),
        total_sales_cumulative: optional_cell(row, Some(columns.total_sales_cumulative)),
        copq: optional_cell(row, columns.copq),
        copq_cumulative: optional_cell(row, columns.copq_cumulative),
    })
}

/// Build the date-sorted daily series from the Dashboard data rows (header excluded).
///
/// Rows without a parsable date are dropped. Duplicate dates are kept in input order.
pub fn build_series(rows: &[RawRow], columns: &ColumnMap) -> Result<DailySeries, PipelineError> {
    let mut series: DailySeries = rows
        .iter()
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .filter_map(|row| {
            let record = build_record(row, columns);
            if record.is_none() {
                debug!("Dropping row with unparsable date: {:?}", cell(row, columns.date));
            }
            record
        })
        .collect();

    if series.is_empty() {
        return Err(PipelineError::EmptySeries);
    }

    // Stable sort keeps same-day rows in sheet order.
    series.sort_by_key(|r| r.date);
    debug!("Built daily series with {} records (from {} rows)", series.len(), rows.len());
    Ok(series)
}
