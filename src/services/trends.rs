// src/services/trends.rs
use log::{debug, warn};

use crate::models::{DailyRecord, DailySeries, RawRow, TrendPoint, TrendSeries, TrendSource};
use super::daily::{cell, parse_date};
use super::numeric::parse_number;

// Sales Report layout: A = date, B = sales type, C = sale amount,
// K = rejection date, L = rejection amount.
const SALE_DATE_COL: usize = 0;
const SALE_TYPE_COL: usize = 1;
const SALE_AMOUNT_COL: usize = 2;
const REJECTION_DATE_COL: usize = 10;
const REJECTION_AMOUNT_COL: usize = 11;

const SALE_TYPE: &str = "OEE";

/// (date text, amount text) pairs pulled out of the Sales Report.
#[derive(Debug, Default)]
struct SalesReportExtract<'a> {
    sales: Vec<(&'a str, &'a str)>,
    rejections: Vec<(&'a str, &'a str)>,
}

fn extract_sales_report(rows: &[RawRow]) -> SalesReportExtract<'_> {
    let mut extract = SalesReportExtract::default();
    if rows.len() < 2 {
        return extract;
    }

    for row in &rows[1..] {
        if row.len() > SALE_AMOUNT_COL {
            let date = cell(row, SALE_DATE_COL).trim();
            let sales_type = cell(row, SALE_TYPE_COL).trim();
            if !date.is_empty() && sales_type.eq_ignore_ascii_case(SALE_TYPE) {
                extract.sales.push((date, cell(row, SALE_AMOUNT_COL)));
            }
        }

        if row.len() > REJECTION_AMOUNT_COL {
            let date = cell(row, REJECTION_DATE_COL).trim();
            let amount = cell(row, REJECTION_AMOUNT_COL);
            if !date.is_empty() && !amount.is_empty() {
                extract.rejections.push((date, amount));
            }
        }
    }
    extract
}

fn to_series(pairs: &[(&str, &str)], source: TrendSource) -> TrendSeries {
    let mut points: Vec<TrendPoint> = pairs
        .iter()
        .filter_map(|(date, amount)| {
            parse_date(date).map(|date| TrendPoint { date, amount: parse_number(amount) })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    TrendSeries { source, points }
}

fn from_daily(daily: &DailySeries, amount: fn(&DailyRecord) -> f64) -> TrendSeries {
    TrendSeries {
        source: TrendSource::Dashboard,
        points: daily
            .iter()
            .map(|r| TrendPoint { date: r.date, amount: amount(r) })
            .collect(),
    }
}

/// Resolve the (sale, rejection) trend series.
///
/// The Sales Report is preferred; each series independently falls back to
/// the Dashboard's day-level column when the report yields no records.
/// `secondary` is `None` when the Sales Report could not be read.
pub fn resolve_trends(secondary: Option<&[RawRow]>, daily: &DailySeries) -> (TrendSeries, TrendSeries) {
    let extract = secondary.map(extract_sales_report).unwrap_or_default();
    debug!(
        "Sales Report yielded {} sale and {} rejection records",
        extract.sales.len(),
        extract.rejections.len()
    );

    let sale = if extract.sales.is_empty() {
        warn!("No OEE sale records in Sales Report, using Dashboard daily sales for the trend");
        from_daily(daily, |r| r.today_sale)
    } else {
        to_series(&extract.sales, TrendSource::SalesReport)
    };

    let rejection = if extract.rejections.is_empty() {
        warn!("No rejection records in Sales Report, using Dashboard daily rejection for the trend");
        from_daily(daily, |r| r.rejection_amount_day)
    } else {
        to_series(&extract.rejections, TrendSource::SalesReport)
    };

    (sale, rejection)
}
