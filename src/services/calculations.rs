// src/services/calculations.rs
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use log::{debug, warn};

use crate::models::{DailySeries, KpiDisplay, KpiSnapshot, TrendSeries};
use super::numeric::{format_amount_value, normalize_percent_value, normalize_rejection_pct};
use super::pipeline::PipelineError;

// Half-to-even, so exact ties (0.125) round the same way Python's round does.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Cumulative sales as a percentage of target, rounded to 2 decimals.
pub fn achieved_pct(cumulative_sale: f64, target_sale: f64) -> f64 {
    if target_sale == 0.0 {
        warn!("Target sale is zero, reporting achieved % as 0");
        0.0
    } else {
        round2(cumulative_sale / target_sale * 100.0)
    }
}

/// Last non-empty cumulative sales value in the series, or 0.
fn latest_cumulative_sale(daily: &DailySeries) -> f64 {
    daily
        .iter()
        .rev()
        .find_map(|r| r.total_sales_cumulative)
        .unwrap_or(0.0)
}

pub fn aggregate(
    daily: &DailySeries,
    trends: (TrendSeries, TrendSeries),
    target_sale: f64,
) -> Result<KpiSnapshot, PipelineError> {
    let latest = daily.last().ok_or(PipelineError::EmptySeries)?;
    let cumulative_sale = latest_cumulative_sale(daily);
    let (sale_trend, rejection_trend) = trends;

    debug!("Aggregating {} records, latest {}", daily.len(), latest.date);

    Ok(KpiSnapshot {
        as_of_date: latest.date,
        latest_today_sale: latest.today_sale,
        latest_oee_pct: normalize_percent_value(latest.oee_pct),
        latest_plan_vs_actual_pct: normalize_percent_value(latest.plan_vs_actual_pct),
        latest_rejection_amount_day: latest.rejection_amount_day,
        latest_rejection_pct: normalize_rejection_pct(latest.rejection_pct),
        latest_rejection_amount_cumulative: latest.rejection_amount_cumulative,
        latest_total_sales_cumulative: cumulative_sale,
        achieved_pct: achieved_pct(cumulative_sale, target_sale),
        sale_trend,
        rejection_trend,
    })
}

/// Expected sales to date: working days (Sundays off) from the first of the
/// month through yesterday, times the daily target.
pub fn indent_value(today: NaiveDate, daily_target: f64) -> f64 {
    let yesterday = today - Duration::days(1);
    let Some(start) = today.with_day(1) else {
        return 0.0;
    };
    if yesterday < start {
        return 0.0;
    }

    let working_days = start
        .iter_days()
        .take_while(|d| *d <= yesterday)
        .filter(|d| d.weekday() != Weekday::Sun)
        .count();
    working_days as f64 * daily_target
}

impl KpiDisplay {
    /// Card strings for the dashboard front end.
    pub fn from_snapshot(snapshot: &KpiSnapshot, indent: f64) -> KpiDisplay {
        KpiDisplay {
            as_of: snapshot.as_of_date.format("%d-%b-%Y").to_string(),
            today_sale: format_amount_value(snapshot.latest_today_sale),
            oee: format!("{:.1}%", snapshot.latest_oee_pct),
            plan_vs_actual: format!("{:.1}%", snapshot.latest_plan_vs_actual_pct),
            rejection_pct: format!("{:.1}%", snapshot.latest_rejection_pct),
            rejection_amount_day: format_amount_value(snapshot.latest_rejection_amount_day),
            rejection_cumulative: format_amount_value(snapshot.latest_rejection_amount_cumulative),
            total_sales_cumulative: format_amount_value(snapshot.latest_total_sales_cumulative),
            achieved: format!("{:.2}%", snapshot.achieved_pct),
            indent: format_amount_value(indent),
        }
    }
}
