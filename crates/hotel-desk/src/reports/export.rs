//! File exports of a report. Both always carry the full daily series, never the chart buckets.
//!
//! The CSV repeats the decimal values exactly as the API sent them.

use chrono::NaiveDate;
use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::format::{fmt_currency, fmt_date, fmt_percent};
use super::render::{period_label, render, ReportKind, ReportPayload};
use super::views::ReportView;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output is not utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub fn csv_file_name(kind: ReportKind, exported_on: NaiveDate) -> String {
    format!("{kind}-report-{}.csv", fmt_date(exported_on))
}

pub fn html_file_name(kind: ReportKind, exported_on: NaiveDate) -> String {
    format!("{kind}-report-{}.html", fmt_date(exported_on))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
}

impl ExportFormat {
    pub fn content_type(self) -> mime::Mime {
        match self {
            Self::Csv => mime::TEXT_CSV_UTF_8,
            Self::Html => mime::TEXT_HTML_UTF_8,
        }
    }

    pub fn file_name(self, kind: ReportKind, exported_on: NaiveDate) -> String {
        match self {
            Self::Csv => csv_file_name(kind, exported_on),
            Self::Html => html_file_name(kind, exported_on),
        }
    }

    /// Rendered document for `payload`.
    pub fn render(self, payload: &ReportPayload, exported_on: NaiveDate) -> Result<String, ExportError> {
        match self {
            Self::Csv => to_csv(payload),
            Self::Html => Ok(to_printable_html(payload, exported_on)),
        }
    }
}

/// Metadata lines, a blank line, then the table.
pub fn to_csv(payload: &ReportPayload) -> Result<String, ExportError> {
    let period = format!("Period: {}", period_label(payload));
    let (preamble, header, rows): (Vec<String>, &[&str], Vec<Vec<String>>) = match payload {
        ReportPayload::Occupancy(report) => (
            vec![
                "Occupancy Report".to_string(),
                period,
                format!("Average Occupancy: {}", fmt_percent(report.average_occupancy)),
            ],
            &["Date", "Occupied", "Total Rooms", "Occupancy Rate"],
            report
                .daily
                .iter()
                .map(|day| {
                    vec![
                        fmt_date(day.date),
                        day.occupied_count.to_string(),
                        day.total_rooms.to_string(),
                        format!("{}%", day.occupancy_rate),
                    ]
                })
                .collect(),
        ),
        ReportPayload::Revenue(report) => (
            vec![
                "Revenue Report".to_string(),
                period,
                format!("Total Revenue: {}", fmt_currency(report.total_revenue)),
            ],
            &["Date", "Revenue"],
            report
                .daily
                .iter()
                .map(|day| vec![fmt_date(day.date), day.revenue.to_string()])
                .collect(),
        ),
        ReportPayload::Trends(report) => (
            vec!["Booking Trends Report".to_string(), period],
            &["Metric", "Value"],
            vec![
                vec!["Total Bookings".to_string(), report.total_bookings.to_string()],
                vec!["Cancellations".to_string(), report.cancellations.to_string()],
                vec!["No-shows".to_string(), report.no_shows.to_string()],
                vec![
                    "Cancellation Rate".to_string(),
                    format!("{}%", report.cancellation_rate),
                ],
                vec!["No-show Rate".to_string(), format!("{}%", report.no_show_rate)],
            ],
        ),
    };

    let mut meta = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for line in &preamble {
        meta.write_record([line])?;
    }
    let mut buffer = meta.into_inner().map_err(|err| err.into_error())?;
    buffer.push(b'\n');

    let mut table = csv::Writer::from_writer(buffer);
    table.write_record(header)?;
    for row in &rows {
        table.write_record(row)?;
    }
    let bytes = table.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

const PRINT_STYLE: &str = "body{font-family:Arial,sans-serif;margin:24px;color:#2c3e50}\
h1{font-size:20px}\
.cards{display:flex;flex-wrap:wrap;gap:12px;margin:16px 0}\
.card{border:1px solid #dcdde1;border-radius:6px;padding:8px 12px}\
.card span{display:block;font-size:12px;color:#7f8c8d}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #dcdde1;padding:4px 8px;text-align:left}";

fn table_rows(payload: &ReportPayload) -> (&'static [&'static str], Vec<Vec<String>>) {
    match payload {
        ReportPayload::Occupancy(report) => (
            &["Date", "Occupied", "Total Rooms", "Occupancy Rate"],
            report
                .daily
                .iter()
                .map(|day| {
                    vec![
                        fmt_date(day.date),
                        day.occupied_count.to_string(),
                        day.total_rooms.to_string(),
                        fmt_percent(day.occupancy_rate),
                    ]
                })
                .collect(),
        ),
        ReportPayload::Revenue(report) => (
            &["Date", "Revenue"],
            report
                .daily
                .iter()
                .map(|day| vec![fmt_date(day.date), fmt_currency(day.revenue)])
                .collect(),
        ),
        ReportPayload::Trends(report) => (
            &["Date", "Bookings"],
            report
                .daily
                .iter()
                .map(|day| vec![fmt_date(day.date), day.bookings.to_string()])
                .collect(),
        ),
    }
}

fn render_table(payload: &ReportPayload) -> Markup {
    let (header, rows) = table_rows(payload);
    html! {
        @if !rows.is_empty() {
            table {
                thead {
                    tr {
                        @for cell in header {
                            th { (cell) }
                        }
                    }
                }
                tbody {
                    @for row in &rows {
                        tr {
                            @for cell in row {
                                td { (cell) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_body(payload: &ReportPayload) -> Markup {
    html! {
        h1 { (payload.kind().heading()) " Report" }
        p.period { "Period: " (period_label(payload)) }
        @match render(payload) {
            ReportView::NoData { message, .. } => {
                p.empty { (message) }
            }
            ReportView::Ready(report) => {
                div.cards {
                    @for card in &report.cards {
                        div.card {
                            span { (card.label) }
                            (card.value)
                        }
                    }
                }
                (render_table(payload))
            }
        }
    }
}

/// Standalone document meant for the browser's print dialog.
pub fn to_printable_html(payload: &ReportPayload, exported_on: NaiveDate) -> String {
    let title = format!("{} Report - {}", payload.kind(), fmt_date(exported_on));
    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(PRINT_STYLE)) }
            }
            body {
                (render_body(payload))
            }
        }
    };
    page.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::schema::{
        DailyMetric, OccupancyReport, RevenueReport, RoomTypeRevenue, TrendsReport,
    };
    use rust_decimal::Decimal;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
    }

    fn dec(raw: &str) -> Decimal {
        raw.parse().expect("decimal")
    }

    fn occupancy() -> OccupancyReport {
        OccupancyReport {
            start_date: date("2024-05-01"),
            end_date: date("2024-05-02"),
            average_occupancy: dec("62.5"),
            max_occupancy: Some(dec("75.00")),
            min_occupancy: Some(dec("50.00")),
            total_room_nights: Some(10),
            daily: vec![
                DailyMetric::occupancy(date("2024-05-01"), 6, 8, dec("75.00")),
                DailyMetric::occupancy(date("2024-05-02"), 4, 8, dec("50")),
            ],
        }
    }

    #[test]
    fn occupancy_csv_layout() {
        let csv = to_csv(&ReportPayload::Occupancy(occupancy())).expect("csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Occupancy Report",
                "Period: 2024-05-01 to 2024-05-02",
                "Average Occupancy: 62.50%",
                "",
                "Date,Occupied,Total Rooms,Occupancy Rate",
                "2024-05-01,6,8,75.00%",
                "2024-05-02,4,8,50%",
            ]
        );
    }

    #[test]
    fn trends_csv_lists_totals_and_rates() {
        let report = TrendsReport {
            start_date: date("2024-01-01"),
            end_date: date("2024-01-31"),
            total_bookings: 40,
            confirmed_bookings: 30,
            cancellations: 8,
            no_shows: 2,
            cancellation_rate: dec("20.00"),
            no_show_rate: dec("5"),
            avg_lead_time_days: None,
            avg_length_of_stay_nights: None,
            daily: Vec::new(),
        };
        let csv = to_csv(&ReportPayload::Trends(report)).expect("csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Booking Trends Report");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Metric,Value");
        assert_eq!(lines[4], "Total Bookings,40");
        assert_eq!(lines[7], "Cancellation Rate,20.00%");
        assert_eq!(lines[8], "No-show Rate,5%");
    }

    #[test]
    fn file_names_carry_kind_and_export_date() {
        assert_eq!(
            csv_file_name(ReportKind::Revenue, date("2024-07-09")),
            "revenue-report-2024-07-09.csv"
        );
        assert_eq!(
            html_file_name(ReportKind::Trends, date("2024-07-09")),
            "trends-report-2024-07-09.html"
        );
    }

    #[test]
    fn formats_carry_content_types() {
        assert_eq!(ExportFormat::Csv.content_type().as_ref(), "text/csv; charset=utf-8");
        assert_eq!(ExportFormat::Html.content_type().essence_str(), "text/html");
        let html = ExportFormat::Html
            .render(&ReportPayload::Occupancy(occupancy()), date("2024-05-03"))
            .expect("html");
        assert!(html.contains("<table"));
    }

    #[test]
    fn revenue_csv_keeps_api_decimals_verbatim() {
        let report: RevenueReport = serde_json::from_str(
            r#"{
                "start_date": "2024-01-01",
                "end_date": "2024-01-02",
                "total_revenue": "250.50",
                "daily": [
                    {"date": "2024-01-01", "revenue": "100.50"},
                    {"date": "2024-01-02", "revenue": "150.00"}
                ]
            }"#,
        )
        .expect("revenue report");
        let csv = to_csv(&ReportPayload::Revenue(report)).expect("csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[2], "Total Revenue: $250.50");
        assert_eq!(&lines[4..], ["Date,Revenue", "2024-01-01,100.50", "2024-01-02,150.00"]);
    }

    #[test]
    fn printable_html_includes_cards_and_table() {
        let html = to_printable_html(&ReportPayload::Occupancy(occupancy()), date("2024-05-03"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>occupancy Report - 2024-05-03</title>"));
        assert!(html.contains("<h1>Occupancy Report</h1>"));
        assert!(html.contains("<span>Average Occupancy</span>62.50%"));
        assert!(html.contains("<td>2024-05-02</td><td>4</td><td>8</td><td>50.00%</td>"));
    }

    #[test]
    fn printable_html_escapes_api_text() {
        let report = RevenueReport {
            start_date: date("2024-01-01"),
            end_date: date("2024-01-01"),
            total_revenue: Decimal::from(90),
            average_daily_revenue: None,
            max_daily_revenue: None,
            min_daily_revenue: None,
            total_paid_bookings: None,
            room_type_breakdown: vec![RoomTypeRevenue {
                room_type: "<b>Suite</b> & Spa".to_string(),
                revenue: Decimal::from(90),
            }],
            daily: vec![DailyMetric::revenue(date("2024-01-01"), Decimal::from(90))],
        };
        let html = to_printable_html(&ReportPayload::Revenue(report), date("2024-01-02"));
        assert!(html.contains("&lt;b&gt;Suite&lt;/b&gt; &amp; Spa ($90.00)"));
        assert!(!html.contains("<b>Suite</b>"));
    }
}
