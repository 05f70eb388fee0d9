//! Seeded synthetic influencer campaign data: roster, posts, tracking events
//! and payouts consistent with each other.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use roi_core::config::GeneratorConfig;
use roi_core::{
    Dataset, Influencer, InfluencerId, Payout, PayoutBasis, Post, TrackingEvent, TrafficSource,
};
use std::collections::HashMap;
use tracing::info;

const CATEGORIES: &[&str] = &["Fitness", "Wellness", "Nutrition"];
const GENDERS: &[&str] = &["Male", "Female", "Other"];
const PLATFORMS: &[&str] = &["Instagram", "YouTube"];
const CAMPAIGNS: &[&str] = &[
    "MB_SummerSale",
    "HKV_ImmunityBoost",
    "Gritzo_Growth",
    "MB_WinterBlast",
];
const PRODUCTS: &[&str] = &["MuscleBlaze Whey", "HKVitals Biotin", "Gritzo SuperMilk"];

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Diya", "Kabir", "Meera", "Rohan", "Ananya", "Vihaan", "Isha", "Arjun", "Saanvi",
    "Neil", "Tara", "Dev", "Kiara", "Aditya", "Riya",
];
const LAST_NAMES: &[&str] = &[
    "Sharma", "Iyer", "Kapoor", "Reddy", "Mehta", "Nair", "Gupta", "Bose", "Chopra", "Menon",
    "Joshi", "Pillai",
];
const CAPTION_WORDS: &[&str] = &[
    "protein", "morning", "routine", "strength", "energy", "daily", "goals", "recovery", "glow",
    "immunity", "growth", "training", "healthy", "habits", "fuel", "stronger",
];

/// Deterministic generator: the same config and end date always produce the
/// same tables.
pub struct SyntheticGenerator {
    config: GeneratorConfig,
    end_date: NaiveDate,
    rng: StdRng,
}

impl SyntheticGenerator {
    /// Dates are drawn from the `lookback_days` before and including `end_date`.
    pub fn new(config: &GeneratorConfig, end_date: NaiveDate) -> Self {
        Self {
            config: config.clone(),
            end_date,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    pub fn generate(mut self) -> Dataset {
        let influencers = self.influencers();
        let posts = self.posts(&influencers);
        let tracking = self.tracking(&influencers);
        let payouts = self.payouts(&influencers, &posts, &tracking);

        info!(
            seed = self.config.seed,
            influencers = influencers.len(),
            posts = posts.len(),
            tracking = tracking.len(),
            payouts = payouts.len(),
            "Synthetic dataset generated"
        );

        Dataset {
            influencers,
            posts,
            tracking,
            payouts,
        }
    }

    fn pick(&mut self, values: &[&str]) -> String {
        values
            .choose(&mut self.rng)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// 50% influencer, 30% organic, 20% paid.
    fn pick_source(&mut self) -> TrafficSource {
        match self.rng.gen_range(0..10) {
            0..=4 => TrafficSource::Influencer,
            5..=7 => TrafficSource::Organic,
            _ => TrafficSource::PaidAd,
        }
    }

    fn random_date(&mut self) -> NaiveDate {
        let offset = self.rng.gen_range(0..=i64::from(self.config.lookback_days));
        self.end_date - Duration::days(offset)
    }

    fn influencers(&mut self) -> Vec<Influencer> {
        (1..=self.config.influencers as u64)
            .map(|id| {
                let name = format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES));
                Influencer {
                    influencer_id: id,
                    name,
                    category: self.pick(CATEGORIES),
                    gender: self.pick(GENDERS),
                    follower_count: self.rng.gen_range(10_000..=1_000_000),
                    platform: self.pick(PLATFORMS),
                }
            })
            .collect()
    }

    fn posts(&mut self, influencers: &[Influencer]) -> Vec<Post> {
        if influencers.is_empty() {
            return Vec::new();
        }
        (1..=self.config.posts as u64)
            .map(|post_id| {
                let owner = &influencers[self.rng.gen_range(0..influencers.len())];
                let caption = (0..10)
                    .map(|_| self.pick(CAPTION_WORDS))
                    .collect::<Vec<_>>()
                    .join(" ");
                Post {
                    post_id,
                    influencer_id: owner.influencer_id,
                    platform: owner.platform.clone(),
                    post_date: self.random_date(),
                    post_url: format!(
                        "https://www.{}.com/p/{:08x}",
                        owner.platform.to_lowercase(),
                        self.rng.gen::<u32>()
                    ),
                    caption,
                    reach: self.rng.gen_range(5_000..=owner.follower_count.max(5_000)),
                    likes: self.rng.gen_range(100..=10_000),
                    comments: self.rng.gen_range(5..=500),
                }
            })
            .collect()
    }

    fn tracking(&mut self, influencers: &[Influencer]) -> Vec<TrackingEvent> {
        (1..=self.config.events as u64)
            .map(|tracking_id| {
                let mut source = self.pick_source();
                let influencer_id = match source {
                    TrafficSource::Influencer => influencers
                        .choose(&mut self.rng)
                        .map(|i| i.influencer_id),
                    _ => None,
                };
                // No roster to attribute to: count the sale as organic.
                if source == TrafficSource::Influencer && influencer_id.is_none() {
                    source = TrafficSource::Organic;
                }

                let orders: u64 = if self.rng.gen_bool(0.95) {
                    1
                } else {
                    self.rng.gen_range(2..=5)
                };
                let revenue = self.rng.gen_range(500.0..5000.0) * orders as f64;

                TrackingEvent {
                    tracking_id,
                    source,
                    campaign: self.pick(CAMPAIGNS),
                    influencer_id,
                    user_id: uuid::Builder::from_random_bytes(self.rng.gen())
                        .into_uuid()
                        .to_string(),
                    product: self.pick(PRODUCTS),
                    transaction_date: self.random_date(),
                    orders,
                    revenue: round_cents(revenue),
                }
            })
            .collect()
    }

    fn payouts(
        &mut self,
        influencers: &[Influencer],
        posts: &[Post],
        tracking: &[TrackingEvent],
    ) -> Vec<Payout> {
        let mut post_counts: HashMap<InfluencerId, u64> = HashMap::new();
        for post in posts {
            *post_counts.entry(post.influencer_id).or_insert(0) += 1;
        }
        let mut order_counts: HashMap<InfluencerId, u64> = HashMap::new();
        for event in tracking {
            if let Some(id) = event.attributed_influencer() {
                *order_counts.entry(id).or_insert(0) += event.orders;
            }
        }

        influencers
            .iter()
            .zip(1u64..)
            .map(|(influencer, payout_id)| {
                let id = influencer.influencer_id;
                if self.rng.gen_bool(0.5) {
                    let rate = round_cents(self.rng.gen_range(3000.0..10000.0));
                    let n_posts = post_counts.get(&id).copied().unwrap_or(0);
                    Payout {
                        payout_id,
                        influencer_id: id,
                        basis: PayoutBasis::PerPost,
                        rate,
                        orders: None,
                        total_payout: round_cents(rate * n_posts as f64),
                    }
                } else {
                    let rate = round_cents(self.rng.gen_range(30.0..100.0));
                    let n_orders = order_counts.get(&id).copied().unwrap_or(0);
                    Payout {
                        payout_id,
                        influencer_id: id,
                        basis: PayoutBasis::PerOrder,
                        rate,
                        orders: Some(n_orders),
                        total_payout: round_cents(rate * n_orders as f64),
                    }
                }
            })
            .collect()
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
