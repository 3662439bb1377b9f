use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregate::{aggregate_with, BucketPolicy, Metric};
use super::format::{fmt_currency, fmt_date, fmt_days, fmt_percent};
use super::views::{ChartDataset, ChartKind, RenderedReport, ReportView, SummaryCard};
use crate::api::schema::{OccupancyReport, RevenueReport, TrendsReport};
use crate::intent::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Occupancy,
    Revenue,
    Trends,
}

impl ReportKind {
    pub const ALL: [Self; 3] = [Self::Occupancy, Self::Revenue, Self::Trends];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Occupancy => "occupancy",
            Self::Revenue => "revenue",
            Self::Trends => "trends",
        }
    }

    pub const fn heading(self) -> &'static str {
        match self {
            Self::Occupancy => "Occupancy",
            Self::Revenue => "Revenue",
            Self::Trends => "Booking Trends",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ValidationError::invalid("report", format!("unknown report '{value}'")))
    }
}

/// Inclusive report window, checked before anything is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ValidationError> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(ValidationError::MissingDates);
        };
        if start > end {
            return Err(ValidationError::DateOrder);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// A decoded report response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportPayload {
    Occupancy(OccupancyReport),
    Revenue(RevenueReport),
    Trends(TrendsReport),
}

impl ReportPayload {
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Occupancy(_) => ReportKind::Occupancy,
            Self::Revenue(_) => ReportKind::Revenue,
            Self::Trends(_) => ReportKind::Trends,
        }
    }

    pub fn period(&self) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Occupancy(report) => (report.start_date, report.end_date),
            Self::Revenue(report) => (report.start_date, report.end_date),
            Self::Trends(report) => (report.start_date, report.end_date),
        }
    }

    pub fn has_data(&self) -> bool {
        match self {
            Self::Occupancy(report) => !report.daily.is_empty(),
            Self::Revenue(report) => !report.daily.is_empty(),
            Self::Trends(report) => report.total_bookings > 0,
        }
    }
}

fn no_data_message(kind: ReportKind) -> String {
    format!("No {kind} data available for selected date range.")
}

pub(crate) fn period_label(payload: &ReportPayload) -> String {
    let (start, end) = payload.period();
    format!("{} to {}", fmt_date(start), fmt_date(end))
}

fn optional_percent(value: Option<Decimal>) -> String {
    value.map(fmt_percent).unwrap_or_else(|| "N/A".to_string())
}

fn optional_currency(value: Option<Decimal>) -> String {
    value.map(fmt_currency).unwrap_or_else(|| "N/A".to_string())
}

fn optional_count(value: Option<u64>) -> String {
    value.map(|count| count.to_string()).unwrap_or_else(|| "N/A".to_string())
}

/// Chart, summary cards and heading for a report, or the empty state.
pub fn render(payload: &ReportPayload) -> ReportView {
    let kind = payload.kind();
    if !payload.has_data() {
        return ReportView::NoData {
            kind,
            message: no_data_message(kind),
        };
    }

    let (chart, cards) = match payload {
        ReportPayload::Occupancy(report) => occupancy_view(report),
        ReportPayload::Revenue(report) => revenue_view(report),
        ReportPayload::Trends(report) => trends_view(report),
    };

    ReportView::Ready(RenderedReport {
        kind,
        heading: kind.heading(),
        period: period_label(payload),
        chart,
        cards,
    })
}

fn occupancy_view(report: &OccupancyReport) -> (ChartDataset, Vec<SummaryCard>) {
    let policy = BucketPolicy::for_len(report.daily.len());
    let buckets = aggregate_with(&report.daily, Metric::OccupancyRate, policy);
    let mut chart =
        ChartDataset::from_buckets(ChartKind::Line, "Occupancy Rate (%)", buckets, policy);
    chart.y_max = Some(100.0);

    let cards = vec![
        SummaryCard::new("Average Occupancy", fmt_percent(report.average_occupancy)),
        SummaryCard::new("Peak Occupancy", optional_percent(report.max_occupancy)),
        SummaryCard::new("Min Occupancy", optional_percent(report.min_occupancy)),
        SummaryCard::new("Total Room-Nights", optional_count(report.total_room_nights)),
    ];
    (chart, cards)
}

fn revenue_view(report: &RevenueReport) -> (ChartDataset, Vec<SummaryCard>) {
    let policy = BucketPolicy::for_len(report.daily.len());
    let title = match policy {
        BucketPolicy::Daily => "Daily Revenue",
        BucketPolicy::Weekly | BucketPolicy::Monthly => "Period Revenue",
    };
    let buckets = aggregate_with(&report.daily, Metric::Revenue, policy);
    let chart = ChartDataset::from_buckets(ChartKind::Bar, title, buckets, policy);

    let mut cards = vec![
        SummaryCard::new("Total Revenue", fmt_currency(report.total_revenue)),
        SummaryCard::new(
            "Avg Daily Revenue",
            optional_currency(report.average_daily_revenue),
        ),
        SummaryCard::new("Max Daily Revenue", optional_currency(report.max_daily_revenue)),
        SummaryCard::new("Min Daily Revenue", optional_currency(report.min_daily_revenue)),
        SummaryCard::new("Paid Bookings", optional_count(report.total_paid_bookings)),
    ];
    // first entry wins ties
    let top = report
        .room_type_breakdown
        .iter()
        .reduce(|best, entry| if entry.revenue > best.revenue { entry } else { best });
    if let Some(top) = top {
        cards.push(SummaryCard::new(
            "Top Room Type",
            format!("{} ({})", top.room_type, fmt_currency(top.revenue)),
        ));
    }
    (chart, cards)
}

fn trends_view(report: &TrendsReport) -> (ChartDataset, Vec<SummaryCard>) {
    let chart = ChartDataset {
        kind: ChartKind::Doughnut,
        title: "Booking Outcomes",
        labels: vec![
            "Confirmed".to_string(),
            "Cancelled".to_string(),
            "No-shows".to_string(),
        ],
        values: vec![
            report.confirmed_bookings as f64,
            report.cancellations as f64,
            report.no_shows as f64,
        ],
        y_max: None,
        bucketing: None,
    };

    let cards = vec![
        SummaryCard::new("Total Bookings", report.total_bookings.to_string()),
        SummaryCard::new("Confirmed", report.confirmed_bookings.to_string()),
        SummaryCard::new("Cancellations", report.cancellations.to_string()),
        SummaryCard::new("No-shows", report.no_shows.to_string()),
        SummaryCard::new("Cancel Rate", fmt_percent(report.cancellation_rate)),
        SummaryCard::new("No-show Rate", fmt_percent(report.no_show_rate)),
        SummaryCard::new(
            "Avg Lead Time",
            fmt_days(report.avg_lead_time_days.unwrap_or(0.0), "days"),
        ),
        SummaryCard::new(
            "Avg Stay",
            fmt_days(report.avg_length_of_stay_nights.unwrap_or(0.0), "nights"),
        ),
    ];
    (chart, cards)
}
