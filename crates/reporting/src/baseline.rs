//! Non-influencer revenue baseline used to estimate incremental lift.

use crate::attribution::in_window;
use chrono::NaiveDate;
use roi_core::{BaselineAveraging, DateWindow, TrackingEvent};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Baseline figures for one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaselineEstimate {
    /// Average organic + paid revenue per day.
    pub daily_revenue: f64,
    /// Calendar span of the window's tracking data, first to last date
    /// inclusive. 1 when there is no baseline traffic.
    pub n_days: i64,
    /// Distinct influencers with influencer-sourced revenue in the window.
    pub attributed_influencers: usize,
}

impl BaselineEstimate {
    /// Baseline revenue expected over the whole window.
    pub fn total(&self) -> f64 {
        self.daily_revenue * self.n_days as f64
    }

    /// Equal share of the window baseline charged to each attributed
    /// influencer; 0 when nobody is attributed.
    pub fn share_per_influencer(&self) -> f64 {
        if self.attributed_influencers == 0 {
            0.0
        } else {
            self.total() / self.attributed_influencers as f64
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineEstimator {
    averaging: BaselineAveraging,
}

impl BaselineEstimator {
    pub fn new(averaging: BaselineAveraging) -> Self {
        Self { averaging }
    }

    pub fn estimate(&self, events: &[TrackingEvent], window: Option<DateWindow>) -> BaselineEstimate {
        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut attributed = HashSet::new();
        let mut first: Option<NaiveDate> = None;
        let mut last: Option<NaiveDate> = None;

        for event in in_window(events, window) {
            let date = event.transaction_date;
            first = Some(first.map_or(date, |d| d.min(date)));
            last = Some(last.map_or(date, |d| d.max(date)));

            if event.source.is_baseline() {
                *daily.entry(date).or_insert(0.0) += event.revenue;
            } else if let Some(id) = event.attributed_influencer() {
                attributed.insert(id);
            }
        }

        let (daily_revenue, n_days) = match (first, last) {
            (Some(first), Some(last)) if !daily.is_empty() => {
                let n_days = (last - first).num_days() + 1;
                let total: f64 = daily.values().sum();
                let daily_revenue = match self.averaging {
                    BaselineAveraging::PresentDays => total / daily.len() as f64,
                    BaselineAveraging::CalendarSpan => total / n_days as f64,
                };
                (daily_revenue, n_days)
            }
            _ => (0.0, 1),
        };

        BaselineEstimate {
            daily_revenue,
            n_days,
            attributed_influencers: attributed.len(),
        }
    }
}
