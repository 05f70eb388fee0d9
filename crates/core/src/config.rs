use crate::error::RoiResult;
use serde::Deserialize;

/// Root application configuration. Loaded from an optional
/// `influencer-roi.toml` in the working directory, then from environment
/// variables with the prefix `INFLUENCER_ROI__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub baseline: BaselineConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// How the non-influencer daily baseline is averaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineAveraging {
    /// Mean over the dates that actually carry organic/paid revenue.
    #[default]
    PresentDays,
    /// Windowed baseline total spread over every calendar day of the window.
    CalendarSpan,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaselineConfig {
    #[serde(default)]
    pub averaging: BaselineAveraging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_poor_roas_threshold")]
    pub poor_roas_threshold: f64,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_influencer_count")]
    pub influencers: usize,
    #[serde(default = "default_post_count")]
    pub posts: usize,
    #[serde(default = "default_event_count")]
    pub events: usize,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

// Default functions
fn default_data_dir() -> String {
    "data".to_string()
}
fn default_output_dir() -> String {
    "out".to_string()
}
fn default_top_n() -> usize {
    5
}
fn default_poor_roas_threshold() -> f64 {
    1.0
}
fn default_summary_file() -> String {
    "influencer_summary.csv".to_string()
}
fn default_seed() -> u64 {
    42
}
fn default_influencer_count() -> usize {
    50
}
fn default_post_count() -> usize {
    200
}
fn default_event_count() -> usize {
    5000
}
fn default_lookback_days() -> u32 {
    182
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            averaging: BaselineAveraging::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            poor_roas_threshold: default_poor_roas_threshold(),
            summary_file: default_summary_file(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            influencers: default_influencer_count(),
            posts: default_post_count(),
            events: default_event_count(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            baseline: BaselineConfig::default(),
            report: ReportConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional config file and the environment.
    pub fn load() -> RoiResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("influencer-roi").required(false))
            .add_source(
                config::Environment::with_prefix("INFLUENCER_ROI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
