use serde::Serialize;

use super::aggregate::{AggregatedBucket, BucketPolicy};
use super::render::ReportKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
}

/// Chart-ready series. `labels` and `values` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub kind: ChartKind,
    pub title: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucketing: Option<BucketPolicy>,
}

impl ChartDataset {
    pub(crate) fn from_buckets(
        kind: ChartKind,
        title: &'static str,
        buckets: Vec<AggregatedBucket>,
        bucketing: BucketPolicy,
    ) -> Self {
        let (labels, values) = buckets
            .into_iter()
            .map(|bucket| (bucket.label, bucket.value))
            .unzip();
        Self {
            kind,
            title,
            labels,
            values,
            y_max: None,
            bucketing: Some(bucketing),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
}

impl SummaryCard {
    pub(crate) fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedReport {
    pub kind: ReportKind,
    pub heading: &'static str,
    pub period: String,
    pub chart: ChartDataset,
    pub cards: Vec<SummaryCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReportView {
    NoData { kind: ReportKind, message: String },
    Ready(RenderedReport),
}

impl ReportView {
    pub fn chart(&self) -> Option<&ChartDataset> {
        match self {
            Self::Ready(report) => Some(&report.chart),
            Self::NoData { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}
