//! Influencer ROI reporting — cost/revenue attribution, baseline estimation,
//! ROAS and incremental ROAS, filtering, KPIs and CSV export.

pub mod attribution;
pub mod baseline;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod metrics;

#[cfg(test)]
mod testing;

pub use baseline::{BaselineEstimate, BaselineEstimator};
pub use dashboard::{revenue_by_source, KpiOverview, SourceRevenuePoint};
pub use export::{summary_csv, write_summary_csv};
pub use filter::{FilterCriteria, FilterOptions};
pub use metrics::{safe_ratio, InfluencerSummary, MetricsEngine, MetricsReport};
