//! CSV export of the influencer summary.

use crate::metrics::InfluencerSummary;
use roi_core::dataset::{write_table, INFLUENCER_COLUMNS};
use roi_core::RoiResult;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const METRIC_COLUMNS: &[&str] = &["total_cost", "total_revenue", "ROAS", "Incremental_ROAS"];

#[derive(Serialize)]
struct SummaryRecord<'a> {
    influencer_id: u64,
    name: &'a str,
    category: &'a str,
    gender: &'a str,
    follower_count: u64,
    platform: &'a str,
    total_cost: f64,
    total_revenue: f64,
    roas: f64,
    incremental_roas: f64,
}

impl<'a> From<&'a InfluencerSummary> for SummaryRecord<'a> {
    fn from(row: &'a InfluencerSummary) -> Self {
        let i = &row.influencer;
        Self {
            influencer_id: i.influencer_id,
            name: &i.name,
            category: &i.category,
            gender: &i.gender,
            follower_count: i.follower_count,
            platform: &i.platform,
            total_cost: row.total_cost,
            total_revenue: row.total_revenue,
            roas: row.roas,
            incremental_roas: row.incremental_roas,
        }
    }
}

pub fn summary_columns() -> Vec<&'static str> {
    INFLUENCER_COLUMNS
        .iter()
        .chain(METRIC_COLUMNS)
        .copied()
        .collect()
}

/// Render the summary as UTF-8 CSV bytes: influencer columns, then metrics.
pub fn summary_csv(rows: &[InfluencerSummary]) -> RoiResult<Vec<u8>> {
    let records: Vec<SummaryRecord<'_>> = rows.iter().map(SummaryRecord::from).collect();
    let mut buf = Vec::new();
    write_table(&mut buf, &summary_columns(), &records)?;
    Ok(buf)
}

pub fn write_summary_csv(path: impl AsRef<Path>, rows: &[InfluencerSummary]) -> RoiResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, summary_csv(rows)?)?;
    info!(path = %path.display(), rows = rows.len(), "Summary exported");
    Ok(())
}
