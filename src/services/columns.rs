// src/services/columns.rs
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::pipeline::PipelineError;

/// The fields the pipeline reads from the Dashboard sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Date,
    TodaySale,
    OeePct,
    PlanVsActualPct,
    RejectionAmountDay,
    RejectionPct,
    RejectionAmountCumulative,
    TotalSalesCumulative,
    Copq,
    CopqCumulative,
}

impl LogicalField {
    pub const ALL: [LogicalField; 10] = [
        LogicalField::Date,
        LogicalField::TodaySale,
        LogicalField::OeePct,
        LogicalField::PlanVsActualPct,
        LogicalField::RejectionAmountDay,
        LogicalField::RejectionPct,
        LogicalField::RejectionAmountCumulative,
        LogicalField::TotalSalesCumulative,
        LogicalField::Copq,
        LogicalField::CopqCumulative,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogicalField::Date => "date",
            LogicalField::TodaySale => "today_sale",
            LogicalField::OeePct => "oee_pct",
            LogicalField::PlanVsActualPct => "plan_vs_actual_pct",
            LogicalField::RejectionAmountDay => "rejection_amount_day",
            LogicalField::RejectionPct => "rejection_pct",
            LogicalField::RejectionAmountCumulative => "rejection_amount_cumulative",
            LogicalField::TotalSalesCumulative => "total_sales_cumulative",
            LogicalField::Copq => "copq",
            LogicalField::CopqCumulative => "copq_cumulative",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, LogicalField::Copq | LogicalField::CopqCumulative)
    }

    /// Canonical label first, then names used by older sheet revisions.
    pub fn default_labels(self) -> &'static [&'static str] {
        match self {
            LogicalField::Date => &["Date"],
            LogicalField::TodaySale => &["Today's Sale", "Todays Sale", "Today Sale"],
            LogicalField::OeePct => &["OEE %"],
            LogicalField::PlanVsActualPct => &["Plan vs Actual %", "Plan Vs Actual"],
            LogicalField::RejectionAmountDay => &[
                "Rejection Amount (DayBefore)",
                "Rejection Amount (Day)",
            ],
            LogicalField::RejectionPct => &["Rejection %"],
            LogicalField::RejectionAmountCumulative => &["Rejection Amount (Cumulative)"],
            LogicalField::TotalSalesCumulative => &[
                "Total Sales (Cumulative)",
                "Total Sale (Cumulative)",
            ],
            LogicalField::Copq => &["COPQ", "COPQ (DayBefore)"],
            LogicalField::CopqCumulative => &["COPQ (Cumulative)"],
        }
    }
}

/// Header labels accepted for each logical field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnLabels {
    labels: HashMap<LogicalField, Vec<String>>,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        let labels = LogicalField::ALL
            .iter()
            .map(|field| {
                let names = field.default_labels().iter().map(|s| s.to_string()).collect();
                (*field, names)
            })
            .collect();
        ColumnLabels { labels }
    }
}

impl ColumnLabels {
    /// Load overrides from a JSON object keyed by field name, e.g.
    /// `{"today_sale": ["Sale Today"]}`. Fields not listed keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read column labels from {}", path.display()))?;
        let overrides: HashMap<LogicalField, Vec<String>> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid column labels JSON in {}", path.display()))?;
        Ok(Self::default().with_overrides(overrides))
    }

    pub fn with_overrides(mut self, overrides: HashMap<LogicalField, Vec<String>>) -> Self {
        for (field, names) in overrides {
            if !names.is_empty() {
                self.labels.insert(field, names);
            }
        }
        self
    }

    pub fn labels_for(&self, field: LogicalField) -> &[String] {
        self.labels.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Physical column index for every logical field of one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub today_sale: usize,
    pub oee_pct: usize,
    pub plan_vs_actual_pct: usize,
    pub rejection_amount_day: usize,
    pub rejection_pct: usize,
    pub rejection_amount_cumulative: usize,
    pub total_sales_cumulative: usize,
    pub copq: Option<usize>,
    pub copq_cumulative: Option<usize>,
}

impl ColumnMap {
    pub fn get(&self, field: LogicalField) -> Option<usize> {
        match field {
            LogicalField::Date => Some(self.date),
            LogicalField::TodaySale => Some(self.today_sale),
            LogicalField::OeePct => Some(self.oee_pct),
            LogicalField::PlanVsActualPct => Some(self.plan_vs_actual_pct),
            LogicalField::RejectionAmountDay => Some(self.rejection_amount_day),
            LogicalField::RejectionPct => Some(self.rejection_pct),
            LogicalField::RejectionAmountCumulative => Some(self.rejection_amount_cumulative),
            LogicalField::TotalSalesCumulative => Some(self.total_sales_cumulative),
            LogicalField::Copq => self.copq,
            LogicalField::CopqCumulative => self.copq_cumulative,
        }
    }
}

/// Lowercase, drop whitespace and the characters `%`, `(`, `)`.
pub fn normalize_header(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '%' | '(' | ')'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn find_column(header: &[String], field: LogicalField, labels: &ColumnLabels) -> Option<usize> {
    let wanted: Vec<String> = labels
        .labels_for(field)
        .iter()
        .map(|l| normalize_header(l))
        .filter(|l| !l.is_empty())
        .collect();

    header
        .iter()
        .position(|cell| wanted.contains(&normalize_header(cell)))
}

fn require(header: &[String], field: LogicalField, labels: &ColumnLabels) -> Result<usize, PipelineError> {
    find_column(header, field, labels).ok_or(PipelineError::MissingColumn { field: field.name() })
}

/// Map the header row onto the logical fields. The first matching header wins.
pub fn resolve_columns(header: &[String], labels: &ColumnLabels) -> Result<ColumnMap, PipelineError> {
    let map = ColumnMap {
        date: require(header, LogicalField::Date, labels)?,
        today_sale: require(header, LogicalField::TodaySale, labels)?,
        oee_pct: require(header, LogicalField::OeePct, labels)?,
        plan_vs_actual_pct: require(header, LogicalField::PlanVsActualPct, labels)?,
        rejection_amount_day: require(header, LogicalField::RejectionAmountDay, labels)?,
        rejection_pct: require(header, LogicalField::RejectionPct, labels)?,
        rejection_amount_cumulative: require(header, LogicalField::RejectionAmountCumulative, labels)?,
        total_sales_cumulative: require(header, LogicalField::TotalSalesCumulative, labels)?,
        copq: find_column(header, LogicalField::Copq, labels),
        copq_cumulative: find_column(header, LogicalField::CopqCumulative, labels),
    };
    debug!("Resolved columns: {:?}", map);
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn standard_header() -> Vec<String> {
        header(&[
            "Date",
            "Today's Sale",
            "OEE %",
            "Plan vs Actual %",
            "Rejection Amount (DayBefore)",
            "Rejection %",
            "Rejection Amount (Cumulative)",
            "Total Sales (Cumulative)",
        ])
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Rejection Amount (DayBefore)"), "rejectionamountdaybefore");
        assert_eq!(normalize_header(" OEE % "), "oee");
        assert_eq!(normalize_header("Today's Sale"), "today'ssale");
    }

    #[test]
    fn test_resolve_standard_header() {
        let map = resolve_columns(&standard_header(), &ColumnLabels::default()).unwrap();
        assert_eq!(map.date, 0);
        assert_eq!(map.oee_pct, 2);
        assert_eq!(map.rejection_pct, 5);
        assert_eq!(map.total_sales_cumulative, 7);
        assert_eq!(map.copq, None);
        assert_eq!(map.copq_cumulative, None);
    }

    #[test]
    fn test_resolve_is_case_space_and_punctuation_insensitive() {
        let labels = ColumnLabels::default();
        for oee in ["OEE %", "oee%", " OEE % ", "OEE"] {
            let mut h = standard_header();
            h[2] = oee.to_string();
            let map = resolve_columns(&h, &labels).unwrap();
            assert_eq!(map.get(LogicalField::OeePct), Some(2), "header {:?}", oee);
        }
    }

    #[test]
    fn test_resolve_reordered_and_historical_names() {
        let h = header(&[
            "total sales(cumulative)",
            "DATE",
            "Todays Sale",
            "rejection %",
            "oee %",
            "Plan Vs Actual",
            "Rejection Amount (Day)",
            "Rejection Amount (Cumulative)",
            "COPQ",
            "COPQ (Cumulative)",
        ]);
        let map = resolve_columns(&h, &ColumnLabels::default()).unwrap();
        assert_eq!(map.total_sales_cumulative, 0);
        assert_eq!(map.date, 1);
        assert_eq!(map.today_sale, 2);
        assert_eq!(map.rejection_pct, 3);
        assert_eq!(map.rejection_amount_day, 6);
        assert_eq!(map.copq, Some(8));
        assert_eq!(map.copq_cumulative, Some(9));
    }

    #[test]
    fn test_first_matching_header_wins() {
        let mut h = standard_header();
        h.push("oee%".to_string());
        let map = resolve_columns(&h, &ColumnLabels::default()).unwrap();
        assert_eq!(map.oee_pct, 2);
    }

    #[test]
    fn test_missing_required_column() {
        let mut h = standard_header();
        h.remove(5);
        let err = resolve_columns(&h, &ColumnLabels::default()).unwrap_err();
        assert_eq!(err, PipelineError::MissingColumn { field: "rejection_pct" });
    }

    #[test]
    fn test_label_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(LogicalField::TodaySale, vec!["Sale Today".to_string()]);
        let labels = ColumnLabels::default().with_overrides(overrides);

        let mut h = standard_header();
        h[1] = "SALE TODAY".to_string();
        let map = resolve_columns(&h, &labels).unwrap();
        assert_eq!(map.today_sale, 1);
    }

    #[test]
    fn test_labels_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, r#"{"oee_pct": ["Efficiency %"]}"#).unwrap();

        let labels = ColumnLabels::from_json_file(&path).unwrap();
        assert_eq!(labels.labels_for(LogicalField::OeePct), ["Efficiency %".to_string()]);
        assert_eq!(labels.labels_for(LogicalField::Date), ["Date".to_string()]);
    }
}
