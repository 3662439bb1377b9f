//! Occupancy, revenue and booking-trend reports: bucketing, rendering and export.

pub mod aggregate;
pub mod export;
pub mod format;
pub mod render;
pub mod service;
pub mod views;

pub use aggregate::{aggregate, AggregatedBucket, BucketPolicy, Metric};
pub use export::{
    csv_file_name, html_file_name, to_csv, to_printable_html, ExportError, ExportFormat,
};
pub use render::{render, DateRange, ReportKind, ReportPayload};
pub use service::{fetch_report, LiveChart, LoadedReport, ReportDesk};
pub use views::{ChartDataset, ChartKind, RenderedReport, ReportView, SummaryCard};
