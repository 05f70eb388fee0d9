//! Shared data model, configuration, errors and table loading for the
//! influencer ROI workspace.

pub mod config;
pub mod dataset;
pub mod error;
pub mod types;

pub use config::{AppConfig, BaselineAveraging};
pub use dataset::Dataset;
pub use error::{RoiError, RoiResult};
pub use types::{
    DateWindow, Influencer, InfluencerId, Payout, PayoutBasis, Post, TrackingEvent, TrafficSource,
};
