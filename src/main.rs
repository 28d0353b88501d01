//! visir-report - Wind Turbine Blade Inspection Reports
//!
//! Batch job: scan paired RGB/thermal image directories, generate one
//! vision-language inspection report per blade, write one HTML document.
//!
//! # Usage
//!
//! ```bash
//! # Run with the deterministic template backend (no model weights)
//! cargo run --release
//!
//! # Run with the Qwen2.5-VL backend (CPU)
//! cargo run --release --features llm
//!
//! # Run with the Qwen2.5-VL backend (GPU - requires CUDA toolkit)
//! cargo run --release --features cuda -- --rgb-dir ./combined_images
//! ```
//!
//! # Environment Variables
//!
//! - `VISIR_CONFIG`: Path to a TOML config file (default: `./visir_report.toml`)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use visir_report::config::ReportConfig;
use visir_report::llm::ProviderFactory;
use visir_report::orchestrator::run_batch;

#[derive(Parser, Debug)]
#[command(name = "visir-report")]
#[command(about = "Wind turbine blade inspection report generator")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides the VISIR_CONFIG search order)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of RGB (visual) inspection images
    #[arg(long, value_name = "DIR")]
    rgb_dir: Option<PathBuf>,

    /// Directory of thermal inspection images
    #[arg(long, value_name = "DIR")]
    thermal_dir: Option<PathBuf>,

    /// Output HTML file path (overwritten if present)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Hub model identifier for the vision-language backend
    #[arg(long)]
    model_id: Option<String>,

    /// Maximum new tokens generated per report
    #[arg(long)]
    max_new_tokens: Option<usize>,
}

impl CliArgs {
    /// Apply command-line overrides on top of the loaded config.
    fn apply(self, config: &mut ReportConfig) {
        if let Some(dir) = self.rgb_dir {
            config.inputs.rgb_dir = dir;
        }
        if let Some(dir) = self.thermal_dir {
            config.inputs.thermal_dir = dir;
        }
        if let Some(path) = self.output {
            config.output.html_path = path;
        }
        if let Some(model_id) = self.model_id {
            config.model.model_id = model_id;
        }
        if let Some(max_new_tokens) = self.max_new_tokens {
            config.model.max_new_tokens = max_new_tokens;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => ReportConfig::load_from_file(path)?,
        None => ReportConfig::load(),
    };
    args.apply(&mut config);

    info!(
        rgb_dir = %config.inputs.rgb_dir.display(),
        thermal_dir = %config.inputs.thermal_dir.display(),
        output = %config.output.html_path.display(),
        model_id = %config.model.model_id,
        "Starting blade inspection report run"
    );

    // The provider is loaded once and injected into the batch run.
    let provider = ProviderFactory::create(&config.model).await?;

    let summary = run_batch(provider.as_ref(), &config).await?;

    info!(
        groups = summary.groups_discovered,
        reports = summary.reports_generated,
        skipped = summary.groups_skipped,
        "Run complete"
    );

    Ok(())
}
