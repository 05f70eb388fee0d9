//! Headline KPIs, rankings and time series over a [`MetricsReport`].

use crate::metrics::{safe_ratio, InfluencerSummary, MetricsReport};
use chrono::NaiveDate;
use roi_core::{TrackingEvent, TrafficSource};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiOverview {
    pub influencers: usize,
    /// Influencer-attributed revenue of the rostered influencers.
    pub total_revenue: f64,
    pub total_spend: f64,
    /// `total_revenue / total_spend` (0.0 when spend is zero).
    pub overall_roas: f64,
    /// Mean of the per-influencer incremental ROAS over every summary row
    /// (0.0 for an empty roster). Zero-cost influencers enter the mean as
    /// 0.0; the original dashboard left them out as undefined instead.
    pub overall_incremental_roas: f64,
    pub baseline_daily_revenue: f64,
    pub window_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRevenuePoint {
    pub date: NaiveDate,
    pub source: TrafficSource,
    pub revenue: f64,
}

impl MetricsReport {
    pub fn overview(&self) -> KpiOverview {
        let total_revenue: f64 = self.rows.iter().map(|r| r.total_revenue).sum();
        let total_spend: f64 = self.rows.iter().map(|r| r.total_cost).sum();
        let incremental_sum: f64 = self.rows.iter().map(|r| r.incremental_roas).sum();

        KpiOverview {
            influencers: self.rows.len(),
            total_revenue,
            total_spend,
            overall_roas: safe_ratio(total_revenue, total_spend),
            overall_incremental_roas: safe_ratio(incremental_sum, self.rows.len() as f64),
            baseline_daily_revenue: self.baseline.daily_revenue,
            window_days: self.baseline.n_days,
        }
    }

    /// Highest ROAS first; ties keep roster order.
    pub fn top_by_roas(&self, n: usize) -> Vec<&InfluencerSummary> {
        self.ranked(n, |r| r.roas)
    }

    /// Highest attributed revenue first; ties keep roster order.
    pub fn top_by_revenue(&self, n: usize) -> Vec<&InfluencerSummary> {
        self.ranked(n, |r| r.total_revenue)
    }

    /// Influencers whose ROAS falls below `threshold`, in roster order.
    pub fn poor_roi(&self, threshold: f64) -> Vec<&InfluencerSummary> {
        self.rows.iter().filter(|r| r.roas < threshold).collect()
    }

    fn ranked<F>(&self, n: usize, key: F) -> Vec<&InfluencerSummary>
    where
        F: Fn(&InfluencerSummary) -> f64,
    {
        let mut rows: Vec<&InfluencerSummary> = self.rows.iter().collect();
        rows.sort_by(|a, b| key(b).total_cmp(&key(a)));
        rows.truncate(n);
        rows
    }
}

/// Revenue per (date, source), ordered by date then source.
pub fn revenue_by_source(events: &[TrackingEvent]) -> Vec<SourceRevenuePoint> {
    let mut totals: BTreeMap<(NaiveDate, TrafficSource), f64> = BTreeMap::new();
    for event in events {
        *totals
            .entry((event.transaction_date, event.source))
            .or_insert(0.0) += event.revenue;
    }

    totals
        .into_iter()
        .map(|((date, source), revenue)| SourceRevenuePoint {
            date,
            source,
            revenue,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineEstimate;
    use crate::testing::{day, event, influencer};

    fn summary(id: u64, cost: f64, revenue: f64, incremental_roas: f64) -> InfluencerSummary {
        InfluencerSummary {
            influencer: influencer(id, "Fitness", "Instagram"),
            total_cost: cost,
            total_revenue: revenue,
            roas: safe_ratio(revenue, cost),
            incremental_roas,
        }
    }

    fn report(rows: Vec<InfluencerSummary>) -> MetricsReport {
        MetricsReport {
            window: None,
            baseline: BaselineEstimate {
                daily_revenue: 50.0,
                n_days: 3,
                attributed_influencers: 2,
            },
            rows,
        }
    }

    #[test]
    fn test_overview_totals() {
        let report = report(vec![
            summary(1, 1000.0, 2000.0, 1.5),
            summary(2, 0.0, 500.0, 0.0),
            summary(3, 1000.0, 500.0, 0.3),
        ]);
        let kpi = report.overview();
        assert_eq!(kpi.influencers, 3);
        assert!((kpi.total_revenue - 3000.0).abs() < f64::EPSILON);
        assert!((kpi.total_spend - 2000.0).abs() < f64::EPSILON);
        assert!((kpi.overall_roas - 1.5).abs() < f64::EPSILON);
        assert!((kpi.overall_incremental_roas - 0.6).abs() < 1e-9);
        assert_eq!(kpi.window_days, 3);
    }

    #[test]
    fn test_overview_of_empty_report() {
        let kpi = report(Vec::new()).overview();
        assert_eq!(kpi.total_spend, 0.0);
        assert_eq!(kpi.overall_roas, 0.0);
        assert_eq!(kpi.overall_incremental_roas, 0.0);
    }

    #[test]
    fn test_rankings() {
        let report = report(vec![
            summary(1, 100.0, 150.0, 0.0),
            summary(2, 100.0, 400.0, 0.0),
            summary(3, 100.0, 50.0, 0.0),
            summary(4, 0.0, 900.0, 0.0),
        ]);

        let by_roas: Vec<u64> = report
            .top_by_roas(2)
            .iter()
            .map(|r| r.influencer.influencer_id)
            .collect();
        assert_eq!(by_roas, vec![2, 1]);

        let by_revenue: Vec<u64> = report
            .top_by_revenue(10)
            .iter()
            .map(|r| r.influencer.influencer_id)
            .collect();
        assert_eq!(by_revenue, vec![4, 2, 1, 3]);

        let poor: Vec<u64> = report
            .poor_roi(1.0)
            .iter()
            .map(|r| r.influencer.influencer_id)
            .collect();
        assert_eq!(poor, vec![3, 4]);
    }

    #[test]
    fn test_revenue_by_source() {
        let events = vec![
            event(1, TrafficSource::Organic, None, day(2), 10.0),
            event(2, TrafficSource::Influencer, Some(1), day(1), 5.0),
            event(3, TrafficSource::Organic, None, day(2), 15.0),
            event(4, TrafficSource::PaidAd, None, day(1), 7.0),
        ];
        let series = revenue_by_source(&events);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, day(1));
        assert_eq!(series[0].source, TrafficSource::Influencer);
        assert_eq!(series[1].source, TrafficSource::PaidAd);
        assert_eq!(series[2].date, day(2));
        assert!((series[2].revenue - 25.0).abs() < f64::EPSILON);
    }
}
