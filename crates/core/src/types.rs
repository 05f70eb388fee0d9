//! Row types for the four input tables plus the shared date window.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type InfluencerId = u64;

// ─── Reference data ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influencer {
    #[serde(deserialize_with = "whole_number")]
    pub influencer_id: InfluencerId,
    pub name: String,
    pub category: String,
    pub gender: String,
    #[serde(deserialize_with = "whole_number")]
    pub follower_count: u64,
    pub platform: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "whole_number")]
    pub post_id: u64,
    #[serde(deserialize_with = "whole_number")]
    pub influencer_id: InfluencerId,
    pub platform: String,
    pub post_date: NaiveDate,
    pub post_url: String,
    pub caption: String,
    #[serde(deserialize_with = "whole_number")]
    pub reach: u64,
    #[serde(deserialize_with = "whole_number")]
    pub likes: u64,
    #[serde(deserialize_with = "whole_number")]
    pub comments: u64,
}

// ─── Tracking ───────────────────────────────────────────────────────────────

/// Marketing source a transaction is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficSource {
    Influencer,
    Organic,
    PaidAd,
}

impl TrafficSource {
    /// Organic and paid traffic make up the non-influencer baseline.
    pub fn is_baseline(self) -> bool {
        matches!(self, Self::Organic | Self::PaidAd)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Influencer => "influencer",
            Self::Organic => "organic",
            Self::PaidAd => "paid_ad",
        }
    }
}

impl fmt::Display for TrafficSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    #[serde(deserialize_with = "whole_number")]
    pub tracking_id: u64,
    pub source: TrafficSource,
    pub campaign: String,
    /// Set only for influencer-sourced transactions.
    #[serde(deserialize_with = "optional_whole_number")]
    pub influencer_id: Option<InfluencerId>,
    pub user_id: String,
    pub product: String,
    pub transaction_date: NaiveDate,
    #[serde(deserialize_with = "whole_number")]
    pub orders: u64,
    pub revenue: f64,
}

impl TrackingEvent {
    /// The influencer this event's revenue is attributed to, if any.
    pub fn attributed_influencer(&self) -> Option<InfluencerId> {
        match self.source {
            TrafficSource::Influencer => self.influencer_id,
            _ => None,
        }
    }
}

// ─── Payouts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutBasis {
    PerPost,
    PerOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    #[serde(deserialize_with = "whole_number")]
    pub payout_id: u64,
    #[serde(deserialize_with = "whole_number")]
    pub influencer_id: InfluencerId,
    pub basis: PayoutBasis,
    pub rate: f64,
    /// Order count the payout was computed from; empty for per-post payouts.
    #[serde(deserialize_with = "optional_whole_number")]
    pub orders: Option<u64>,
    pub total_payout: f64,
}

// ─── Date window ────────────────────────────────────────────────────────────

/// Inclusive calendar-date range. A window whose start lies after its end
/// contains no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Build a window, swapping the bounds if they arrive reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ─── Lenient numeric columns ────────────────────────────────────────────────
//
// Tables exported from dataframe tools write nullable integer columns as
// floats ("12.0") and nulls as empty cells.

fn parse_whole(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u64>() {
        return Some(value);
    }
    let value: f64 = trimmed.parse().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

fn whole_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_whole(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a whole number, got {raw:?}")))
}

fn optional_whole_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    parse_whole(trimmed)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a whole number, got {raw:?}")))
}
