//! Influencer ROI — attribution and ROAS reporting for influencer campaigns.
//!
//! Loads the roster, posts, tracking and payout tables, applies the requested
//! filters, computes per-influencer metrics and exports the summary.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use roi_core::config::AppConfig;
use roi_core::{BaselineAveraging, Dataset, DateWindow};
use roi_datagen::SyntheticGenerator;
use roi_reporting::{
    revenue_by_source, write_summary_csv, FilterCriteria, FilterOptions, InfluencerSummary,
    KpiOverview, MetricsEngine, MetricsReport, SourceRevenuePoint,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "influencer-roi")]
#[command(about = "ROAS and incremental ROAS reporting for influencer campaigns")]
#[command(version)]
struct Cli {
    /// Directory holding the input CSV tables (overrides config)
    #[arg(long, global = true, env = "INFLUENCER_ROI__DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute metrics and export the influencer summary
    Report(ReportArgs),
    /// List the products, platforms, categories and dates available to filter on
    Options,
    /// Write a seeded synthetic dataset into the data directory
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug)]
struct ReportArgs {
    /// First transaction date to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last transaction date to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Restrict to these products (repeatable)
    #[arg(long = "product")]
    products: Vec<String>,

    /// Restrict to these platforms (repeatable)
    #[arg(long = "platform")]
    platforms: Vec<String>,

    /// Restrict to these influencer categories (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Baseline day averaging (overrides config)
    #[arg(long, value_enum)]
    averaging: Option<AveragingArg>,

    /// Rows in each ranking (overrides config)
    #[arg(long)]
    top: Option<usize>,

    /// Summary CSV path (defaults to <output_dir>/<summary_file>)
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    influencers: Option<usize>,

    #[arg(long)]
    posts: Option<usize>,

    #[arg(long)]
    events: Option<usize>,

    /// Last date of the generated period (defaults to today)
    #[arg(long)]
    end_date: Option<NaiveDate>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AveragingArg {
    PresentDays,
    CalendarSpan,
}

impl From<AveragingArg> for BaselineAveraging {
    fn from(arg: AveragingArg) -> Self {
        match arg {
            AveragingArg::PresentDays => BaselineAveraging::PresentDays,
            AveragingArg::CalendarSpan => BaselineAveraging::CalendarSpan,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    filters: &'a FilterCriteria,
    kpis: KpiOverview,
    top_by_roas: Vec<&'a InfluencerSummary>,
    top_by_revenue: Vec<&'a InfluencerSummary>,
    poor_roi: Vec<&'a InfluencerSummary>,
    revenue_over_time: Vec<SourceRevenuePoint>,
    summary_path: String,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "influencer_roi=info,roi_core=info,roi_reporting=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.display().to_string();
    }

    info!(data_dir = %config.data_dir, "Configuration loaded");

    match cli.command {
        Command::Report(args) => run_report(config, args),
        Command::Options => run_options(&config),
        Command::Generate(args) => run_generate(config, args),
    }
}

fn selection(values: Vec<String>) -> Option<BTreeSet<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.into_iter().collect())
    }
}

fn run_report(mut config: AppConfig, args: ReportArgs) -> anyhow::Result<()> {
    if let Some(averaging) = args.averaging {
        config.baseline.averaging = averaging.into();
    }
    if let Some(top) = args.top {
        config.report.top_n = top;
    }

    let dataset = Dataset::load_dir(&config.data_dir)?;
    let options = FilterOptions::from_dataset(&dataset);

    let date_range = options.requested_window(args.start, args.end);

    let criteria = FilterCriteria {
        date_range,
        products: selection(args.products),
        platforms: selection(args.platforms),
        categories: selection(args.categories),
    };
    let filtered = criteria.apply(&dataset);

    let engine = MetricsEngine::new(&config.baseline);
    let report = engine.compute(&filtered, None);

    let summary_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output_dir).join(&config.report.summary_file));
    write_summary_csv(&summary_path, &report.rows)?;

    let output = ReportOutput {
        filters: &criteria,
        kpis: report.overview(),
        top_by_roas: report.top_by_roas(config.report.top_n),
        top_by_revenue: report.top_by_revenue(config.report.top_n),
        poor_roi: report.poor_roi(config.report.poor_roas_threshold),
        revenue_over_time: revenue_by_source(&filtered.tracking),
        summary_path: summary_path.display().to_string(),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => print_report(&report, &output),
    }
    Ok(())
}

fn run_options(config: &AppConfig) -> anyhow::Result<()> {
    let dataset = Dataset::load_dir(&config.data_dir)?;
    let options = FilterOptions::from_dataset(&dataset);
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

fn run_generate(mut config: AppConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let generator = &mut config.generator;
    if let Some(seed) = args.seed {
        generator.seed = seed;
    }
    if let Some(n) = args.influencers {
        generator.influencers = n;
    }
    if let Some(n) = args.posts {
        generator.posts = n;
    }
    if let Some(n) = args.events {
        generator.events = n;
    }

    let end_date = args.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let dataset = SyntheticGenerator::new(&config.generator, end_date).generate();
    dataset.write_dir(&config.data_dir)?;

    println!("Sample data generated and saved to {}", config.data_dir);
    Ok(())
}

// ─── Text rendering ─────────────────────────────────────────────────────────

/// `1234567.8` → `1,234,568`.
fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 && out.chars().any(|c| c != '0' && c != ',') {
        out.insert(0, '-');
    }
    out
}

fn print_ranking(title: &str, rows: &[&InfluencerSummary]) {
    println!("\n{title}");
    if rows.is_empty() {
        println!("  (none)");
    }
    for row in rows {
        let i = &row.influencer;
        println!(
            "  {:<24} {:<10} {:<10} revenue {:>12}  cost {:>12}  ROAS {:>6.2}",
            i.name,
            i.category,
            i.platform,
            group_thousands(row.total_revenue),
            group_thousands(row.total_cost),
            row.roas
        );
    }
}

fn print_report(report: &MetricsReport, output: &ReportOutput<'_>) {
    let kpis = &output.kpis;
    println!("Influencer ROI report");
    println!("=====================");
    println!("Influencers             {}", kpis.influencers);
    println!("Total revenue           {}", group_thousands(kpis.total_revenue));
    println!("Total spend             {}", group_thousands(kpis.total_spend));
    println!("Overall ROAS            {:.2}", kpis.overall_roas);
    println!("Overall incremental     {:.2}", kpis.overall_incremental_roas);
    println!(
        "Baseline                {}/day over {} day(s)",
        group_thousands(report.baseline.daily_revenue),
        report.baseline.n_days
    );

    print_ranking("Top influencers by ROAS", &output.top_by_roas);
    print_ranking("Top influencers by revenue", &output.top_by_revenue);
    print_ranking("Influencers with poor ROI", &output.poor_roi);

    println!("\nSummary written to {}", output.summary_path);
}
