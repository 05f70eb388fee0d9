//! Date / product / platform / category projection of a [`Dataset`].
//!
//! Each set left as `None` places no restriction. The result keeps the input
//! schema so the metrics engine can be re-run on it unchanged.

use chrono::NaiveDate;
use roi_core::{Dataset, DateWindow, Influencer, Post, TrackingEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_range: Option<DateWindow>,
    pub products: Option<BTreeSet<String>>,
    pub platforms: Option<BTreeSet<String>>,
    pub categories: Option<BTreeSet<String>>,
}

fn allows(set: &Option<BTreeSet<String>>, value: &str) -> bool {
    set.as_ref().map_or(true, |s| s.contains(value))
}

impl FilterCriteria {
    pub fn keeps_event(&self, event: &TrackingEvent) -> bool {
        allows(&self.products, &event.product)
            && self
                .date_range
                .map_or(true, |w| w.contains(event.transaction_date))
    }

    pub fn keeps_influencer(&self, influencer: &Influencer) -> bool {
        allows(&self.platforms, &influencer.platform) && allows(&self.categories, &influencer.category)
    }

    pub fn keeps_post(&self, post: &Post) -> bool {
        allows(&self.platforms, &post.platform)
            && self.date_range.map_or(true, |w| w.contains(post.post_date))
    }

    /// Build the filtered copy. Tracking events are filtered by product and
    /// date, influencers by platform and category, posts by platform and
    /// date. Payouts carry no date or product and are kept whole.
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        let filtered = Dataset {
            influencers: dataset
                .influencers
                .iter()
                .filter(|i| self.keeps_influencer(i))
                .cloned()
                .collect(),
            posts: dataset
                .posts
                .iter()
                .filter(|p| self.keeps_post(p))
                .cloned()
                .collect(),
            tracking: dataset
                .tracking
                .iter()
                .filter(|e| self.keeps_event(e))
                .cloned()
                .collect(),
            payouts: dataset.payouts.clone(),
        };

        debug!(
            influencers = filtered.influencers.len(),
            tracking = filtered.tracking.len(),
            posts = filtered.posts.len(),
            "Dataset filtered"
        );
        filtered
    }
}

/// Distinct values a caller can filter on, plus the tracking date bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub products: Vec<String>,
    pub platforms: Vec<String>,
    pub categories: Vec<String>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let products: BTreeSet<&str> = dataset.tracking.iter().map(|e| e.product.as_str()).collect();
        let platforms: BTreeSet<&str> =
            dataset.influencers.iter().map(|i| i.platform.as_str()).collect();
        let categories: BTreeSet<&str> =
            dataset.influencers.iter().map(|i| i.category.as_str()).collect();

        Self {
            products: products.into_iter().map(str::to_string).collect(),
            platforms: platforms.into_iter().map(str::to_string).collect(),
            categories: categories.into_iter().map(str::to_string).collect(),
            first_date: dataset.tracking.iter().map(|e| e.transaction_date).min(),
            last_date: dataset.tracking.iter().map(|e| e.transaction_date).max(),
        }
    }

    /// Window for caller-supplied bounds. Two bounds are taken as given
    /// (reversed ones are swapped). A single bound is closed with the
    /// tracking data's own first or last date without swapping, so a bound
    /// lying past the data yields a window that matches nothing.
    pub fn requested_window(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<DateWindow> {
        match (start, end) {
            (Some(start), Some(end)) => Some(DateWindow::new(start, end)),
            (Some(start), None) => Some(DateWindow {
                start,
                end: self.last_date.unwrap_or(start),
            }),
            (None, Some(end)) => Some(DateWindow {
                start: self.first_date.unwrap_or(end),
                end,
            }),
            (None, None) => None,
        }
    }
}
