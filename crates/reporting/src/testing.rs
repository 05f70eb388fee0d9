//! Row builders shared by the unit tests.

use chrono::NaiveDate;
use roi_core::{Influencer, InfluencerId, Payout, PayoutBasis, TrackingEvent, TrafficSource};

/// Day `n` of March 2024.
pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, n).unwrap()
}

pub fn influencer(id: InfluencerId, category: &str, platform: &str) -> Influencer {
    Influencer {
        influencer_id: id,
        name: format!("Influencer {id}"),
        category: category.to_string(),
        gender: "Female".to_string(),
        follower_count: 10_000 * id,
        platform: platform.to_string(),
    }
}

pub fn event(
    tracking_id: u64,
    source: TrafficSource,
    influencer_id: Option<InfluencerId>,
    date: NaiveDate,
    revenue: f64,
) -> TrackingEvent {
    TrackingEvent {
        tracking_id,
        source,
        campaign: "MB_SummerSale".to_string(),
        influencer_id,
        user_id: format!("user-{tracking_id}"),
        product: "MuscleBlaze Whey".to_string(),
        transaction_date: date,
        orders: 1,
        revenue,
    }
}

pub fn payout(payout_id: u64, influencer_id: InfluencerId, total: f64) -> Payout {
    Payout {
        payout_id,
        influencer_id,
        basis: PayoutBasis::PerPost,
        rate: total,
        orders: None,
        total_payout: total,
    }
}
