//! Per-influencer ROAS and incremental ROAS, merged onto the roster.

use crate::attribution::{aggregate_cost, aggregate_revenue};
use crate::baseline::{BaselineEstimate, BaselineEstimator};
use roi_core::config::BaselineConfig;
use roi_core::{Dataset, DateWindow, Influencer};
use serde::Serialize;
use tracing::debug;

/// `numerator / denominator`, with 0 substituted for a zero denominator or
/// any non-finite result.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// One roster row with its cost, revenue and return metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencerSummary {
    pub influencer: Influencer,
    pub total_cost: f64,
    pub total_revenue: f64,
    /// `total_revenue / total_cost` (0.0 when cost is zero).
    pub roas: f64,
    /// Revenue above the influencer's baseline share, over cost (0.0 when
    /// cost is zero or the influencer has no attributed revenue).
    pub incremental_roas: f64,
}

/// Output of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub window: Option<DateWindow>,
    pub baseline: BaselineEstimate,
    pub rows: Vec<InfluencerSummary>,
}

/// Stateless metrics pipeline. Every call recomputes from the tables it is
/// given, so it can be re-run on any filtered subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngine {
    estimator: BaselineEstimator,
}

impl MetricsEngine {
    pub fn new(config: &BaselineConfig) -> Self {
        Self {
            estimator: BaselineEstimator::new(config.averaging),
        }
    }

    /// Compute the influencer summary for `dataset`. Revenue and baseline are
    /// restricted to `window` when one is given; cost never is.
    pub fn compute(&self, dataset: &Dataset, window: Option<DateWindow>) -> MetricsReport {
        let cost = aggregate_cost(&dataset.payouts);
        let revenue = aggregate_revenue(&dataset.tracking, window);
        let baseline = self.estimator.estimate(&dataset.tracking, window);
        let share = baseline.share_per_influencer();

        let rows: Vec<InfluencerSummary> = dataset
            .influencers
            .iter()
            .map(|influencer| {
                let id = influencer.influencer_id;
                let total_cost = cost.get(&id).copied().unwrap_or(0.0);
                let attributed = revenue.get(&id).copied();
                let total_revenue = attributed.unwrap_or(0.0);
                let incremental_roas = attributed
                    .map(|r| safe_ratio(r - share, total_cost))
                    .unwrap_or(0.0);

                InfluencerSummary {
                    influencer: influencer.clone(),
                    total_cost,
                    total_revenue,
                    roas: safe_ratio(total_revenue, total_cost),
                    incremental_roas,
                }
            })
            .collect();

        debug!(
            influencers = rows.len(),
            costed = cost.len(),
            attributed = revenue.len(),
            baseline_daily = baseline.daily_revenue,
            n_days = baseline.n_days,
            "Influencer metrics computed"
        );

        MetricsReport {
            window,
            baseline,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{day, event, influencer, payout};
    use roi_core::{BaselineAveraging, TrafficSource};

    fn row<'a>(report: &'a MetricsReport, id: u64) -> &'a InfluencerSummary {
        report
            .rows
            .iter()
            .find(|r| r.influencer.influencer_id == id)
            .unwrap()
    }

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(10.0, 4.0), 2.5);
        assert_eq!(safe_ratio(10.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(f64::NAN, 2.0), 0.0);
        assert_eq!(safe_ratio(f64::MAX, f64::MIN_POSITIVE), 0.0);
    }

    #[test]
    fn test_roas_with_and_without_cost() {
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram"), influencer(2, "Wellness", "YouTube")],
            posts: Vec::new(),
            tracking: vec![
                event(1, TrafficSource::Influencer, Some(1), day(1), 2000.0),
                event(2, TrafficSource::Influencer, Some(2), day(1), 500.0),
            ],
            payouts: vec![payout(1, 1, 1000.0)],
        };
        let report = MetricsEngine::default().compute(&dataset, None);

        let a = row(&report, 1);
        assert!((a.roas - 2.0).abs() < f64::EPSILON);
        let b = row(&report, 2);
        assert_eq!(b.total_cost, 0.0);
        assert!((b.total_revenue - 500.0).abs() < f64::EPSILON);
        assert_eq!(b.roas, 0.0);
        assert_eq!(b.incremental_roas, 0.0);
    }

    #[test]
    fn test_incremental_roas_two_day_window() {
        // Baseline 100/day over a 2-day window, one attributed influencer:
        // 1000 - 100 * 2 / 1 = 800 incremental over 500 cost.
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram")],
            posts: Vec::new(),
            tracking: vec![
                event(1, TrafficSource::Influencer, Some(1), day(1), 600.0),
                event(2, TrafficSource::Influencer, Some(1), day(2), 400.0),
                event(3, TrafficSource::Organic, None, day(1), 60.0),
                event(4, TrafficSource::PaidAd, None, day(1), 40.0),
                event(5, TrafficSource::Organic, None, day(2), 100.0),
            ],
            payouts: vec![payout(1, 1, 500.0)],
        };
        let report = MetricsEngine::default().compute(&dataset, None);

        assert!((report.baseline.daily_revenue - 100.0).abs() < 1e-9);
        assert_eq!(report.baseline.n_days, 2);
        let r = row(&report, 1);
        assert!((r.roas - 2.0).abs() < 1e-9);
        assert!((r.incremental_roas - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_no_baseline_incremental_equals_roas() {
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram"), influencer(2, "Nutrition", "YouTube")],
            posts: Vec::new(),
            tracking: vec![
                event(1, TrafficSource::Influencer, Some(1), day(1), 900.0),
                event(2, TrafficSource::Influencer, Some(2), day(4), 300.0),
            ],
            payouts: vec![payout(1, 1, 300.0), payout(2, 2, 600.0)],
        };
        let report = MetricsEngine::default().compute(&dataset, None);
        for r in &report.rows {
            assert!((r.incremental_roas - r.roas).abs() < 1e-12);
        }
    }

    #[test]
    fn test_baseline_split_across_attributed_influencers() {
        // Baseline 300 on one day; span days 1..=2 → 600 total, split over
        // influencers 1 and 2 (influencer 3 is outside the roster but still counts).
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram"), influencer(2, "Fitness", "Instagram")],
            posts: Vec::new(),
            tracking: vec![
                event(1, TrafficSource::Organic, None, day(1), 300.0),
                event(2, TrafficSource::Influencer, Some(1), day(2), 1000.0),
                event(3, TrafficSource::Influencer, Some(2), day(2), 100.0),
                event(4, TrafficSource::Influencer, Some(3), day(2), 100.0),
            ],
            payouts: vec![payout(1, 1, 400.0), payout(2, 2, 100.0)],
        };
        let report = MetricsEngine::default().compute(&dataset, None);
        assert_eq!(report.baseline.attributed_influencers, 3);
        // share = 600 / 3 = 200
        assert!((row(&report, 1).incremental_roas - 2.0).abs() < 1e-9);
        assert!((row(&report, 2).incremental_roas - (-1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_calendar_span_engine() {
        let config = BaselineConfig {
            averaging: BaselineAveraging::CalendarSpan,
        };
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram")],
            posts: Vec::new(),
            tracking: vec![
                event(1, TrafficSource::Organic, None, day(1), 400.0),
                event(2, TrafficSource::Influencer, Some(1), day(4), 1000.0),
            ],
            payouts: vec![payout(1, 1, 500.0)],
        };
        let report = MetricsEngine::new(&config).compute(&dataset, None);
        // 400 over 4 calendar days = 100/day; 100 * 4 = 400 subtracted.
        assert!((report.baseline.daily_revenue - 100.0).abs() < 1e-9);
        assert!((report.rows[0].incremental_roas - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_cost_without_revenue_has_zero_incremental() {
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram")],
            posts: Vec::new(),
            tracking: vec![event(1, TrafficSource::Organic, None, day(1), 400.0)],
            payouts: vec![payout(1, 1, 500.0)],
        };
        let report = MetricsEngine::default().compute(&dataset, None);
        let r = &report.rows[0];
        assert_eq!(r.total_revenue, 0.0);
        assert_eq!(r.roas, 0.0);
        assert_eq!(r.incremental_roas, 0.0);
    }

    #[test]
    fn test_empty_tables_keep_roster() {
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram"), influencer(2, "Wellness", "YouTube")],
            ..Default::default()
        };
        let report = MetricsEngine::default().compute(&dataset, None);
        assert_eq!(report.rows.len(), 2);
        for r in &report.rows {
            assert_eq!(r.total_cost, 0.0);
            assert_eq!(r.total_revenue, 0.0);
            assert_eq!(r.roas, 0.0);
            assert_eq!(r.incremental_roas, 0.0);
        }
        assert_eq!(report.baseline.n_days, 1);
    }

    #[test]
    fn test_unknown_influencers_are_dropped() {
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram")],
            posts: Vec::new(),
            tracking: vec![event(1, TrafficSource::Influencer, Some(99), day(1), 700.0)],
            payouts: vec![payout(1, 99, 100.0)],
        };
        let report = MetricsEngine::default().compute(&dataset, None);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].total_cost, 0.0);
        assert_eq!(report.rows[0].total_revenue, 0.0);
    }

    #[test]
    fn test_window_limits_revenue_but_not_cost() {
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram")],
            posts: Vec::new(),
            tracking: vec![
                event(1, TrafficSource::Influencer, Some(1), day(1), 700.0),
                event(2, TrafficSource::Influencer, Some(1), day(10), 300.0),
            ],
            payouts: vec![payout(1, 1, 100.0)],
        };
        let window = DateWindow::new(day(5), day(15));
        let report = MetricsEngine::default().compute(&dataset, Some(window));
        assert_eq!(report.window, Some(window));
        assert!((report.rows[0].total_revenue - 300.0).abs() < f64::EPSILON);
        assert!((report.rows[0].total_cost - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let dataset = Dataset {
            influencers: vec![influencer(1, "Fitness", "Instagram"), influencer(2, "Wellness", "YouTube")],
            posts: Vec::new(),
            tracking: vec![
                event(1, TrafficSource::Influencer, Some(1), day(1), 700.0),
                event(2, TrafficSource::Organic, None, day(2), 50.0),
                event(3, TrafficSource::Influencer, Some(2), day(3), 20.0),
            ],
            payouts: vec![payout(1, 1, 100.0), payout(2, 2, 10.0)],
        };
        let engine = MetricsEngine::default();
        assert_eq!(engine.compute(&dataset, None), engine.compute(&dataset, None));
    }
}
