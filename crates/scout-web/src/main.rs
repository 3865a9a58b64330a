//! Research-assistant HTTP server.
//!
//! # Usage
//!
//! ```bash
//! OPENROUTER_KEY=sk-... cargo run -p scout-web
//! OPENROUTER_KEY=sk-... cargo run -p scout-web -- --port 8080
//! OPENROUTER_KEY=sk-... cargo run -p scout-web -- --static-dir web/dist
//! ```
//!
//! Then:
//!
//! ```bash
//! curl -X POST http://127.0.0.1:3001/api/research \
//!   -H 'content-type: application/json' \
//!   -d '{"query": "weather in Paris"}'
//! ```

use std::sync::Arc;

use clap::Parser;
use scout_rs::config::Config;
use scout_rs::session::ResearchPipeline;

/// Research-assistant HTTP server.
#[derive(Parser)]
#[command(name = "scout-web")]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Model to use for reasoning (overrides SCOUT_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Directory of static files to serve alongside the API.
    #[arg(long)]
    static_dir: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(model) = args.model {
        config.model = Some(model);
    }

    let pipeline = ResearchPipeline::from_config(&config).map_err(|e| e.to_string())?;
    tracing::info!("enabled adapters: {:?}", pipeline.enabled_adapters());

    let router = scout_web::build_router(Arc::new(pipeline), args.static_dir);
    let addr = scout_web::start_server(router, ([127, 0, 0, 1], args.port).into())
        .await
        .map_err(|e| format!("failed to bind port {}: {e}", args.port))?;

    println!("API: http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to wait for shutdown signal: {e}"))?;
    Ok(())
}
