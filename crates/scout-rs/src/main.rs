//! Run a research session from the command line and print the report.
//!
//! Reads credentials from the environment (a `.env` file is honored):
//! `OPENROUTER_KEY` is required; `BRAVE_SEARCH_KEY`, `NEWSAPI_KEY`, and
//! `OPENWEATHER_KEY` each enable their provider's adapter.
//!
//! # Examples
//!
//! ```sh
//! # One-off question
//! scout "weather in Paris"
//!
//! # Pick a model and keep a running log of reports
//! scout --model anthropic/claude-sonnet-4 --save research.log \
//!   "history of the transistor"
//!
//! # More verbose tracing
//! scout -vv "latest rust news"
//! ```

use clap::Parser;
use scout_rs::config::Config;
use scout_rs::session::ResearchPipeline;
use std::path::PathBuf;
use std::process;

/// Answer a research question using external sources and a hosted model.
///
/// Reads the model API key from the OPENROUTER_KEY environment variable.
#[derive(Parser)]
#[command(name = "scout")]
struct Cli {
    /// The question to research
    #[arg(required = true)]
    query: Vec<String>,

    /// Model to use for reasoning (overrides SCOUT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Maximum tokens in the answer
    #[arg(long, default_value_t = 1024)]
    max_tokens: u32,

    /// Sampling temperature (0.0 = deterministic)
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    /// Append the report to this log file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<String, String> {
    let mut config = Config::from_env();
    if let Some(model) = &cli.model {
        config.model = Some(model.clone());
    }
    config.max_tokens = cli.max_tokens;
    config.temperature = cli.temperature;

    let pipeline = ResearchPipeline::from_config(&config).map_err(|e| e.to_string())?;

    let query = cli.query.join(" ");
    let report = pipeline.run(&query).await.map_err(|e| e.to_string())?;

    if let Some(path) = &cli.save {
        report
            .append_to_log(path)
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    }

    Ok(report.render())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
