mod config;
mod errors;
mod llm_client;
mod loader;
mod models;
mod screening;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::screening::pipeline::{run, RunConfig};

#[derive(Parser)]
#[command(name = "cvscreen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Batch-scores candidate CVs against a job description", long_about = None)]
struct Cli {
    /// Directory containing jd.txt and cv<N>.txt
    #[arg(long, default_value = "sample_inputs")]
    inputs: PathBuf,

    /// Directory for JSON results and Markdown reports
    #[arg(long, default_value = "outputs")]
    out: PathBuf,

    /// Directory where each rendered prompt is saved
    #[arg(long, default_value = "prompts")]
    prompts: PathBuf,

    /// Number of candidate files (cv1.txt .. cv<N>.txt)
    #[arg(long, default_value_t = 3)]
    candidates: u32,

    /// Sampling temperature passed to the model
    #[arg(long, default_value_t = 0.2)]
    temperature: f64,
}

/// Pause between candidates, to stay clear of coarse rate limits.
const INTER_CANDIDATE_PAUSE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing GEMINI_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvscreen v{}", env!("CARGO_PKG_VERSION"));

    // Constructed once, shared by reference for the whole run
    let client = GeminiClient::new(config.gemini_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let run_config = RunConfig {
        input_dir: cli.inputs,
        output_dir: cli.out,
        prompt_dir: cli.prompts,
        candidates: cli.candidates,
        temperature: cli.temperature,
        pause: INTER_CANDIDATE_PAUSE,
    };

    let summary = run(&client, &run_config).await?;
    info!(
        "done: {} evaluated, {} skipped",
        summary.evaluated, summary.skipped
    );

    Ok(())
}
