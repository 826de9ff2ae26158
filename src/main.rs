//! cloudspend - command-line entry point
//!
//! Answers one cost question against a JSON snapshot of cloud inventory,
//! metrics and billing, and prints the synthesized report as JSON.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use cloudspend::cloudspend_core::domain::analyzer::AnalysisDepth;
use cloudspend::cloudspend_core::domain::provider::MAX_WINDOW_DAYS;
use cloudspend::cloudspend_core::infrastructure::StaticCloudProvider;
use cloudspend::{Config, create_app, init_tracing};

/// Multi-category cloud cost analysis
#[derive(Parser, Debug)]
#[command(
    name = "cloudspend",
    version,
    about = "Analyze cloud spend and rank savings opportunities",
    long_about = "Plans which cost categories a question touches (compute, storage, database, \
                  commitments, tagging), runs those analyzers concurrently against a snapshot \
                  of cloud data, and prints one ranked, narrated report as JSON."
)]
struct Cli {
    /// The cost question, e.g. "urgent: analyze EC2 and S3 costs"
    query: String,

    /// JSON snapshot with inventory, utilization metrics and billed cost
    #[arg(long, env = "CLOUDSPEND_SNAPSHOT")]
    snapshot: PathBuf,

    /// Days of history to analyze, 1 to 3650 (defaults to the configured window)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS)))]
    days: Option<u32>,

    /// Analysis depth: summary, standard or detailed
    #[arg(long)]
    depth: Option<AnalysisDepth>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // Only warn if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.logging).context("Failed to initialize logging")?;

    let provider = Arc::new(
        StaticCloudProvider::from_json_file(&cli.snapshot)
            .with_context(|| format!("Failed to load snapshot {}", cli.snapshot.display()))?,
    );
    tracing::info!(snapshot = %cli.snapshot.display(), "Loaded cloud snapshot");

    let app = create_app(&config, provider.clone(), provider);

    let mut request = app.request(cli.query);
    if let Some(days) = cli.days.and_then(NonZeroU32::new) {
        request = request.with_time_window_days(days);
    }
    if let Some(depth) = cli.depth {
        request = request.with_depth(depth);
    }

    let report = app.use_case.execute(&request).await;
    app.use_case.flush_reports().await;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);

    if report.is_degraded() {
        anyhow::bail!(
            "analysis pipeline failed: {}",
            report.error.unwrap_or_default()
        );
    }
    Ok(())
}
