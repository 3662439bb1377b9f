use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::render::{render, DateRange, ReportKind, ReportPayload};
use super::views::{ChartDataset, ReportView};
use crate::api::{ApiClient, ApiError};
use crate::intent::{DeskError, Outcome, StatusMessage};
use crate::session::Session;

/// Requests one report for a checked range.
pub async fn fetch_report(
    client: &ApiClient,
    kind: ReportKind,
    range: DateRange,
) -> Result<ReportPayload, ApiError> {
    let (start, end) = (range.start(), range.end());
    let payload = match kind {
        ReportKind::Occupancy => ReportPayload::Occupancy(client.occupancy_report(start, end).await?),
        ReportKind::Revenue => ReportPayload::Revenue(client.revenue_report(start, end).await?),
        ReportKind::Trends => ReportPayload::Trends(client.trends_report(start, end).await?),
    };
    Ok(payload)
}

/// The chart currently on screen. Dropping it tears it down.
#[derive(Debug)]
pub struct LiveChart {
    id: u64,
    dataset: ChartDataset,
}

impl LiveChart {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn dataset(&self) -> &ChartDataset {
        &self.dataset
    }
}

impl Drop for LiveChart {
    fn drop(&mut self) {
        debug!(chart = self.id, title = self.dataset.title, "chart destroyed");
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadedReport {
    pub payload: ReportPayload,
    pub view: ReportView,
}

/// Report screen state: the last loaded report and at most one live chart.
#[derive(Debug, Default)]
pub struct ReportDesk {
    chart: Option<LiveChart>,
    charts_created: u64,
    last: Option<LoadedReport>,
}

impl ReportDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart(&self) -> Option<&LiveChart> {
        self.chart.as_ref()
    }

    pub fn last(&self) -> Option<&LoadedReport> {
        self.last.as_ref()
    }

    /// Destroys the previous chart before installing the next one.
    fn install_chart(&mut self, dataset: Option<ChartDataset>) {
        drop(self.chart.take());
        if let Some(dataset) = dataset {
            self.charts_created += 1;
            self.chart = Some(LiveChart {
                id: self.charts_created,
                dataset,
            });
        }
    }

    /// Shows `payload` as the current report.
    pub fn show(&mut self, payload: ReportPayload) -> &LoadedReport {
        let view = render(&payload);
        self.install_chart(view.chart().cloned());
        self.last.insert(LoadedReport { payload, view })
    }

    pub async fn fetch(
        &mut self,
        session: &mut Session,
        kind: ReportKind,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Outcome<LoadedReport>, DeskError> {
        let range = DateRange::new(start, end).map_err(|err| {
            warn!(report = %kind, error = %err, "report request rejected");
            DeskError::from(err)
        })?;

        let result = fetch_report(session.require_authenticated()?, kind, range).await;
        let payload = session.settle(result)?;
        info!(report = %kind, days = range.days(), "report loaded");

        let loaded = self.show(payload).clone();
        Ok(Outcome::new(loaded, StatusMessage::cleared()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::schema::{DailyMetric, RevenueReport};
    use crate::session::MemoryStateStore;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn revenue(days: i64) -> ReportPayload {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        ReportPayload::Revenue(RevenueReport {
            start_date: start,
            end_date: start + chrono::Duration::days(days.max(1) - 1),
            total_revenue: Decimal::ZERO,
            average_daily_revenue: None,
            max_daily_revenue: None,
            min_daily_revenue: None,
            total_paid_bookings: None,
            room_type_breakdown: Vec::new(),
            daily: (0..days)
                .map(|offset| {
                    DailyMetric::revenue(start + chrono::Duration::days(offset), Decimal::ONE)
                })
                .collect(),
        })
    }

    #[test]
    fn new_report_replaces_the_live_chart() {
        let mut desk = ReportDesk::new();
        desk.show(revenue(10));
        assert_eq!(desk.chart().map(LiveChart::id), Some(1));

        desk.show(revenue(120));
        let chart = desk.chart().expect("chart");
        assert_eq!(chart.id(), 2);
        assert_eq!(chart.dataset().title, "Period Revenue");
    }

    #[test]
    fn empty_report_leaves_no_chart() {
        let mut desk = ReportDesk::new();
        desk.show(revenue(10));
        let loaded = desk.show(revenue(0));
        assert!(loaded.view.is_empty());
        assert!(desk.chart().is_none());
    }

    #[tokio::test]
    async fn invalid_range_is_rejected_before_any_request() {
        let store = Arc::new(MemoryStateStore::new());
        let mut session = Session::new(ApiClient::new("http://127.0.0.1:9"), store);
        let mut desk = ReportDesk::new();
        let start = NaiveDate::from_ymd_opt(2024, 2, 1);
        let end = NaiveDate::from_ymd_opt(2024, 1, 1);

        let err = desk
            .fetch(&mut session, ReportKind::Occupancy, start, end)
            .await
            .expect_err("reversed range");
        assert_eq!(err.to_string(), "start_date must be <= end_date");
        assert!(desk.last().is_none());
    }
}
