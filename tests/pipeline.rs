use chrono::NaiveDate;
use factory_kpi_dashboard::models::{RawRow, TrendSource};
use factory_kpi_dashboard::services::columns::ColumnLabels;
use factory_kpi_dashboard::services::pipeline::{build_snapshot, PipelineError};

fn row(cells: &[&str]) -> RawRow {
    cells.iter().map(|s| s.to_string()).collect()
}

fn header() -> RawRow {
    row(&[
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

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn two_day_sheet_produces_expected_kpis() {
    let rows = vec![
        header(),
        row(&["01-Jan-2025", "1000", "0.88", "0.95", "50", "0.016", "500", "100000"]),
        row(&["02-Jan-2025", "2000", "92", "96", "40", "1.2", "540", "102000"]),
    ];
    let snapshot = build_snapshot(&rows, None, &ColumnLabels::default(), 200000.0).unwrap();

    assert_eq!(snapshot.as_of_date, ymd(2025, 1, 2));
    assert_eq!(snapshot.latest_today_sale, 2000.0);
    assert_eq!(snapshot.latest_oee_pct, 92.0);
    assert_eq!(snapshot.latest_plan_vs_actual_pct, 96.0);
    assert_eq!(snapshot.latest_rejection_pct, 1.2);
    assert_eq!(snapshot.latest_rejection_amount_day, 40.0);
    assert_eq!(snapshot.latest_rejection_amount_cumulative, 540.0);
    assert_eq!(snapshot.latest_total_sales_cumulative, 102000.0);
    assert_eq!(snapshot.achieved_pct, 51.0);
}

#[test]
fn five_day_sheet_without_sales_report_uses_dashboard_trends() {
    let mut rows = vec![header()];
    for day in 1..=5 {
        let date = format!("0{}-Jan-2025", day);
        let sale = (day * 1000).to_string();
        let rejection = (day * 10).to_string();
        rows.push(row(&[&date, &sale, "90", "95", &rejection, "1.5", "100", "5000"]));
    }
    let snapshot = build_snapshot(&rows, None, &ColumnLabels::default(), 10000.0).unwrap();

    assert_eq!(snapshot.sale_trend.source, TrendSource::Dashboard);
    assert_eq!(snapshot.sale_trend.len(), 5);
    assert_eq!(snapshot.rejection_trend.len(), 5);
    let sales: Vec<f64> = snapshot.sale_trend.points.iter().map(|p| p.amount).collect();
    assert_eq!(sales, vec![1000.0, 2000.0, 3000.0, 4000.0, 5000.0]);
    let rejections: Vec<f64> = snapshot.rejection_trend.points.iter().map(|p| p.amount).collect();
    assert_eq!(rejections, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
}

#[test]
fn sales_report_drives_trends_when_present() {
    let rows = vec![
        header(),
        row(&["01-Jan-2025", "1000", "90", "95", "50", "1.5", "500", "1000"]),
    ];
    let mut report_row = row(&["01-Jan-2025", "OEE", "7,500", "", "", "", "", "", "", "", "01-Jan-2025", "320"]);
    report_row.push("ignored".to_string());
    let report = vec![row(&["Date", "Sales Type", "Sale Amount"]), report_row];

    let snapshot = build_snapshot(&rows, Some(report.as_slice()), &ColumnLabels::default(), 0.0).unwrap();
    assert_eq!(snapshot.sale_trend.source, TrendSource::SalesReport);
    assert_eq!(snapshot.sale_trend.points[0].amount, 7500.0);
    assert_eq!(snapshot.rejection_trend.points[0].amount, 320.0);
    assert_eq!(snapshot.achieved_pct, 0.0);
}

#[test]
fn duplicate_dates_keep_last_cumulative_value() {
    let rows = vec![
        header(),
        row(&["01-Jan-2025", "1000", "90", "95", "50", "1.5", "500", "1000"]),
        row(&["02-Jan-2025", "1500", "90", "95", "50", "1.5", "550", "2500"]),
        row(&["02-Jan-2025", "400", "91", "95", "20", "1.1", "570", ""]),
    ];
    let snapshot = build_snapshot(&rows, None, &ColumnLabels::default(), 5000.0).unwrap();
    assert_eq!(snapshot.latest_today_sale, 400.0);
    assert_eq!(snapshot.latest_total_sales_cumulative, 2500.0);
    assert_eq!(snapshot.achieved_pct, 50.0);
}

#[test]
fn header_variations_from_older_sheets() {
    let rows = vec![
        row(&[
            " date ",
            "TODAY'S SALE",
            "oee%",
            "plan vs actual%",
            "Rejection Amount(DayBefore)",
            "Rejection%",
            "Rejection Amount (Cumulative)",
            "Total Sales (Cumulative)",
            "COPQ",
        ]),
        row(&["2025-03-01", "₹ 12,34,567", "87.5%", "101", "1,200", "1.4%", "45,000", "2,00,00,000", ""]),
    ];
    let snapshot = build_snapshot(&rows, None, &ColumnLabels::default(), 199200000.0).unwrap();
    assert_eq!(snapshot.latest_today_sale, 1234567.0);
    assert_eq!(snapshot.latest_oee_pct, 87.5);
    assert_eq!(snapshot.latest_rejection_pct, 1.4);
    assert_eq!(snapshot.achieved_pct, 10.04);
}

#[test]
fn structural_failures_are_surfaced() {
    let labels = ColumnLabels::default();

    let no_rows: Vec<RawRow> = Vec::new();
    assert_eq!(build_snapshot(&no_rows, None, &labels, 1.0), Err(PipelineError::EmptySeries));

    let header_only = vec![header()];
    assert_eq!(build_snapshot(&header_only, None, &labels, 1.0), Err(PipelineError::EmptySeries));

    let undated = vec![header(), row(&["TBD", "1000", "90", "95", "50", "1.5", "500", "1000"])];
    assert_eq!(build_snapshot(&undated, None, &labels, 1.0), Err(PipelineError::EmptySeries));

    let mut broken_header = header();
    broken_header[2] = "Efficiency".to_string();
    let rows = vec![broken_header, row(&["01-Jan-2025", "1000", "90", "95", "50", "1.5", "500", "1000"])];
    assert_eq!(
        build_snapshot(&rows, None, &labels, 1.0),
        Err(PipelineError::MissingColumn { field: "oee_pct" })
    );
}

#[test]
fn two_digit_year_row_is_the_latest() {
    let rows = vec![
        header(),
        row(&["01-Jan-2025", "1000", "90", "95", "50", "1.5", "500", "1000"]),
        row(&["02-Jan-25", "2000", "91", "95", "40", "1.2", "540", "3000"]),
    ];
    let snapshot = build_snapshot(&rows, None, &ColumnLabels::default(), 6000.0).unwrap();
    assert_eq!(snapshot.as_of_date, ymd(2025, 1, 2));
    assert_eq!(snapshot.latest_today_sale, 2000.0);
    assert_eq!(snapshot.latest_total_sales_cumulative, 3000.0);
    assert_eq!(snapshot.achieved_pct, 50.0);
}
