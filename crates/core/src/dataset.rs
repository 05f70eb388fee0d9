//! The four input tables and their CSV loader.

use crate::error::{RoiError, RoiResult};
use crate::types::{Influencer, Payout, Post, TrackingEvent, TrafficSource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::hash::Hash;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

pub const INFLUENCERS_FILE: &str = "influencers.csv";
pub const POSTS_FILE: &str = "posts.csv";
pub const TRACKING_FILE: &str = "tracking_data.csv";
pub const PAYOUTS_FILE: &str = "payouts.csv";

pub const INFLUENCER_COLUMNS: &[&str] = &[
    "influencer_id",
    "name",
    "category",
    "gender",
    "follower_count",
    "platform",
];
pub const POST_COLUMNS: &[&str] = &[
    "post_id",
    "influencer_id",
    "platform",
    "post_date",
    "post_url",
    "caption",
    "reach",
    "likes",
    "comments",
];
pub const TRACKING_COLUMNS: &[&str] = &[
    "tracking_id",
    "source",
    "campaign",
    "influencer_id",
    "user_id",
    "product",
    "transaction_date",
    "orders",
    "revenue",
];
pub const PAYOUT_COLUMNS: &[&str] = &[
    "payout_id",
    "influencer_id",
    "basis",
    "rate",
    "orders",
    "total_payout",
];

/// In-memory copy of the influencer roster, posts, tracking events and
/// payouts. Filtering produces a new `Dataset` with the same shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub influencers: Vec<Influencer>,
    pub posts: Vec<Post>,
    pub tracking: Vec<TrackingEvent>,
    pub payouts: Vec<Payout>,
}

impl Dataset {
    /// Load and validate all four tables from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> RoiResult<Self> {
        let dir = dir.as_ref();
        let dataset = Self {
            influencers: read_table_file(&dir.join(INFLUENCERS_FILE), INFLUENCER_COLUMNS)?,
            posts: read_table_file(&dir.join(POSTS_FILE), POST_COLUMNS)?,
            tracking: read_table_file(&dir.join(TRACKING_FILE), TRACKING_COLUMNS)?,
            payouts: read_table_file(&dir.join(PAYOUTS_FILE), PAYOUT_COLUMNS)?,
        };
        dataset.validate()?;

        info!(
            dir = %dir.display(),
            influencers = dataset.influencers.len(),
            posts = dataset.posts.len(),
            tracking = dataset.tracking.len(),
            payouts = dataset.payouts.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Write all four tables into `dir`, creating it if needed.
    pub fn write_dir(&self, dir: impl AsRef<Path>) -> RoiResult<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        write_table_file(&dir.join(INFLUENCERS_FILE), INFLUENCER_COLUMNS, &self.influencers)?;
        write_table_file(&dir.join(POSTS_FILE), POST_COLUMNS, &self.posts)?;
        write_table_file(&dir.join(TRACKING_FILE), TRACKING_COLUMNS, &self.tracking)?;
        write_table_file(&dir.join(PAYOUTS_FILE), PAYOUT_COLUMNS, &self.payouts)?;
        info!(dir = %dir.display(), "Dataset written");
        Ok(())
    }

    /// Check key uniqueness and the per-row constraints of each table.
    pub fn validate(&self) -> RoiResult<()> {
        ensure_unique("influencers", self.influencers.iter().map(|i| i.influencer_id))?;
        ensure_unique("posts", self.posts.iter().map(|p| p.post_id))?;
        ensure_unique("tracking_data", self.tracking.iter().map(|t| t.tracking_id))?;
        ensure_unique("payouts", self.payouts.iter().map(|p| p.payout_id))?;

        for event in &self.tracking {
            if event.source == TrafficSource::Influencer && event.influencer_id.is_none() {
                return Err(RoiError::validation(
                    "tracking_data",
                    format!(
                        "tracking_id {} has source influencer but no influencer_id",
                        event.tracking_id
                    ),
                ));
            }
            if !event.revenue.is_finite() || event.revenue < 0.0 {
                return Err(RoiError::validation(
                    "tracking_data",
                    format!(
                        "tracking_id {} has invalid revenue {}",
                        event.tracking_id, event.revenue
                    ),
                ));
            }
            if event.orders == 0 {
                return Err(RoiError::validation(
                    "tracking_data",
                    format!("tracking_id {} has zero orders", event.tracking_id),
                ));
            }
        }

        for payout in &self.payouts {
            if !payout.total_payout.is_finite() || payout.total_payout < 0.0 {
                return Err(RoiError::validation(
                    "payouts",
                    format!(
                        "payout_id {} has invalid total_payout {}",
                        payout.payout_id, payout.total_payout
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn ensure_unique<K, I>(table: &str, keys: I) -> RoiResult<()>
where
    K: Copy + Eq + Hash + std::fmt::Display,
    I: IntoIterator<Item = K>,
{
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(RoiError::validation(table, format!("duplicate key {key}")));
        }
    }
    Ok(())
}

fn read_table_file<T: DeserializeOwned>(path: &Path, columns: &[&str]) -> RoiResult<Vec<T>> {
    let table = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = std::fs::File::open(path)?;
    read_table(file, &table, columns)
}

/// Deserialize a headed CSV table, checking the required columns first.
/// Extra columns are ignored.
pub fn read_table<T, R>(reader: R, table: &str, columns: &[&str]) -> RoiResult<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: HashSet<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if let Some(missing) = columns.iter().find(|c| !headers.contains(**c)) {
        return Err(RoiError::Schema {
            table: table.to_string(),
            column: missing.to_string(),
        });
    }

    let rows = rdr.deserialize().collect::<Result<Vec<T>, _>>()?;
    debug!(table, rows = rows.len(), "Table read");
    Ok(rows)
}

fn write_table_file<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> RoiResult<()> {
    let file = std::fs::File::create(path)?;
    write_table(file, columns, rows)
}

/// Serialize rows under an explicit header, so empty tables keep their schema.
/// Row fields must be declared in `columns` order.
pub fn write_table<T, W>(writer: W, columns: &[&str], rows: &[T]) -> RoiResult<()>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(columns)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
