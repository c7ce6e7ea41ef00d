// src/models.rs
use serde::{Serialize, Deserialize};
use chrono::NaiveDate;

/// One spreadsheet row as the row source returned it: text cells, "" for blanks.
pub type RawRow = Vec<String>;

/// One calendar day from the Dashboard sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub today_sale: f64,
    // Percentages are kept as read; normalization happens at aggregation.
    pub oee_pct: f64,
    pub plan_vs_actual_pct: f64,
    pub rejection_amount_day: f64,
    pub rejection_pct: f64,
    pub rejection_amount_cumulative: f64,
    pub total_sales_cumulative: Option<f64>,
    pub copq: Option<f64>,
    pub copq_cumulative: Option<f64>,
}

/// Daily records sorted ascending by date. Duplicate dates are kept.
pub type DailySeries = Vec<DailyRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Where a trend series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSource {
    SalesReport,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub source: TrendSource,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Output of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub as_of_date: NaiveDate,
    pub latest_today_sale: f64,
    pub latest_oee_pct: f64,
    pub latest_plan_vs_actual_pct: f64,
    pub latest_rejection_amount_day: f64,
    pub latest_rejection_pct: f64,
    pub latest_rejection_amount_cumulative: f64,
    pub latest_total_sales_cumulative: f64,
    pub achieved_pct: f64,
    pub sale_trend: TrendSeries,
    pub rejection_trend: TrendSeries,
}

/// Card strings as the dashboard shows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDisplay {
    pub as_of: String,
    pub today_sale: String,
    pub oee: String,
    pub plan_vs_actual: String,
    pub rejection_pct: String,
    pub rejection_amount_day: String,
    pub rejection_cumulative: String,
    pub total_sales_cumulative: String,
    pub achieved: String,
    pub indent: String,
}
