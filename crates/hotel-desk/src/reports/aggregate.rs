//! Reduces a dense daily series into chart buckets sized by the length of the range.

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::api::schema::DailyMetric;

const DAILY_LIMIT: usize = 90;
const WEEKLY_LIMIT: usize = 180;
const WEEK: usize = 7;
const MONTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    OccupancyRate,
    Revenue,
}

impl Metric {
    fn value(self, day: &DailyMetric) -> f64 {
        let raw = match self {
            Self::OccupancyRate => day.occupancy_rate,
            Self::Revenue => day.revenue,
        };
        raw.to_f64().unwrap_or_default()
    }

    fn combine(self, values: &[f64]) -> f64 {
        let sum: f64 = values.iter().sum();
        match self {
            Self::Revenue => sum,
            Self::OccupancyRate if values.is_empty() => 0.0,
            Self::OccupancyRate => sum / values.len() as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketPolicy {
    Daily,
    Weekly,
    Monthly,
}

impl BucketPolicy {
    pub fn for_len(days: usize) -> Self {
        if days <= DAILY_LIMIT {
            Self::Daily
        } else if days <= WEEKLY_LIMIT {
            Self::Weekly
        } else {
            Self::Monthly
        }
    }

    pub const fn window(self) -> usize {
        match self {
            Self::Daily => 1,
            Self::Weekly => WEEK,
            Self::Monthly => MONTH,
        }
    }

    fn label(self, window: &[DailyMetric]) -> String {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return String::new();
        };
        match self {
            Self::Daily => first.date.format("%Y-%m-%d").to_string(),
            Self::Weekly => format!(
                "{} to {}",
                first.date.format("%Y-%m-%d"),
                last.date.format("%Y-%m-%d")
            ),
            Self::Monthly => first.date.format("%b %y").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedBucket {
    pub label: String,
    pub value: f64,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Buckets `series` for display.
///
/// Up to 90 days every day is its own bucket holding the day's value unchanged. Up to 180
/// days the series is cut into 7-day windows, beyond that into 30-day windows. A short final
/// window is combined over the days it has. Occupancy windows hold the mean rate and revenue
/// windows the sum, both rounded to two decimals.
pub fn aggregate(series: &[DailyMetric], metric: Metric) -> Vec<AggregatedBucket> {
    let policy = BucketPolicy::for_len(series.len());
    aggregate_with(series, metric, policy)
}

pub fn aggregate_with(
    series: &[DailyMetric],
    metric: Metric,
    policy: BucketPolicy,
) -> Vec<AggregatedBucket> {
    series
        .chunks(policy.window())
        .map(|window| {
            let values: Vec<f64> = window.iter().map(|day| metric.value(day)).collect();
            let value = match policy {
                BucketPolicy::Daily => metric.combine(&values),
                BucketPolicy::Weekly | BucketPolicy::Monthly => round2(metric.combine(&values)),
            };
            AggregatedBucket {
                label: policy.label(window),
                value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;

    fn dec(raw: &str) -> Decimal {
        raw.parse().expect("decimal")
    }

    fn revenue_series(days: usize) -> Vec<DailyMetric> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        (0..days)
            .map(|offset| {
                DailyMetric::revenue(
                    start + Duration::days(offset as i64),
                    Decimal::from(10 + offset as i64),
                )
            })
            .collect()
    }

    #[test]
    fn short_ranges_stay_daily() {
        let buckets = aggregate(&revenue_series(45), Metric::Revenue);
        assert_eq!(buckets.len(), 45);
        assert_eq!(buckets[0].label, "2024-01-01");
        assert_eq!(buckets[44].value, 54.0);
    }

    #[test]
    fn ninety_days_is_still_daily() {
        assert_eq!(BucketPolicy::for_len(90), BucketPolicy::Daily);
        assert_eq!(BucketPolicy::for_len(91), BucketPolicy::Weekly);
        assert_eq!(BucketPolicy::for_len(180), BucketPolicy::Weekly);
        assert_eq!(BucketPolicy::for_len(181), BucketPolicy::Monthly);
    }

    #[test]
    fn weekly_windows_sum_revenue_with_range_labels() {
        let buckets = aggregate(&revenue_series(120), Metric::Revenue);
        assert_eq!(buckets.len(), 18);
        assert_eq!(buckets[0].label, "2024-01-01 to 2024-01-07");
        assert_eq!(buckets[0].value, (10..17).map(f64::from).sum::<f64>());
        // final window holds 120 - 17 * 7 = 1 day
        assert_eq!(buckets[17].label, "2024-04-29 to 2024-04-29");
        assert_eq!(buckets[17].value, 129.0);
    }

    #[test]
    fn monthly_windows_average_occupancy() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        let series: Vec<DailyMetric> = (0..200)
            .map(|offset| {
                let rate = if offset % 2 == 0 { dec("33.333") } else { dec("66.667") };
                DailyMetric::occupancy(start + Duration::days(offset), 10, 30, rate)
            })
            .collect();
        let buckets = aggregate(&series, Metric::OccupancyRate);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "Jan 24");
        assert_eq!(buckets[0].value, 50.0);
        assert_eq!(buckets[1].label, "Jan 24");
        assert_eq!(buckets[2].label, "Mar 24");
    }

    #[test]
    fn daily_values_pass_through_unrounded() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        let buckets = aggregate(&[DailyMetric::revenue(start, dec("12.3456"))], Metric::Revenue);
        assert_eq!(buckets.len(), 1);
        assert!((buckets[0].value - 12.3456).abs() < 1e-9);

        let series = vec![
            DailyMetric::occupancy(start, 1, 3, dec("33.3333")),
            DailyMetric::occupancy(start + Duration::days(1), 2, 3, dec("66.6666")),
        ];
        let buckets = aggregate(&series, Metric::OccupancyRate);
        assert!((buckets[0].value - 33.3333).abs() < 1e-9);
        assert!((buckets[1].value - 66.6666).abs() < 1e-9);
    }

    #[test]
    fn window_values_round_to_two_decimals() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        let series: Vec<DailyMetric> = (0..100)
            .map(|offset| {
                DailyMetric::occupancy(start + Duration::days(offset), 1, 3, dec("33.3333"))
            })
            .collect();
        let buckets = aggregate(&series, Metric::OccupancyRate);
        assert_eq!(buckets.len(), 15);
        assert!(buckets.iter().all(|bucket| bucket.value == 33.33));

        let revenue: Vec<DailyMetric> = (0..100)
            .map(|offset| DailyMetric::revenue(start + Duration::days(offset), dec("0.001")))
            .collect();
        let buckets = aggregate(&revenue, Metric::Revenue);
        assert_eq!(buckets[0].value, 0.01);
    }

    #[test]
    fn empty_series_yields_no_buckets() {
        assert!(aggregate(&[], Metric::Revenue).is_empty());
        assert!(aggregate(&[], Metric::OccupancyRate).is_empty());
    }
}
