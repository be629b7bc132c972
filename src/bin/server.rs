//! HTTP service binary.
//!
//! Exposes voice-session control and PDF summarization:
//! `POST /api/start-voicebot`, `POST /api/stop-voicebot`, and
//! `POST /process_pdf`.
//!
//! # Examples
//!
//! ```bash
//! VAPI_API_KEY=... GEMINI_API_KEY=... server --port 5001
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use paperlens::server::{router, AppState, ServerConfig};
use paperlens::summarize::GeminiSummarizer;
use paperlens::voice::agent::HostedVoiceAgent;
use paperlens::voice::{AssistantConfig, VoiceController};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the voice-agent API key.
const VOICE_API_KEY_ENV: &str = "VAPI_API_KEY";

/// Run the voice-session and process-pdf HTTP service
#[derive(Parser, Debug)]
#[command(
    name = "server",
    version,
    about = "Serve voice-session control and PDF summarization over HTTP",
    long_about = "Start the HTTP service backing the assistant frontend: voice-session \
                  start/stop with a fixed assistant persona, and PDF summarization via \
                  the generative-language API.

EXAMPLES:
  Default bind address (127.0.0.1:5001):
    VAPI_API_KEY=... GEMINI_API_KEY=... server

  Custom port:
    VAPI_API_KEY=... GEMINI_API_KEY=... server --port 8080"
)]
struct Args {
    /// Bind host
    #[arg(long, value_name = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Bind port
    #[arg(long, value_name = "PORT", default_value_t = 5001)]
    port: u16,

    /// Logging verbosity level
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level);

    let voice_api_key = std::env::var(VOICE_API_KEY_ENV)
        .with_context(|| format!("{VOICE_API_KEY_ENV} environment variable must be set"))?;
    let agent =
        HostedVoiceAgent::new(voice_api_key).context("Failed to create the voice-agent client")?;
    let summarizer = GeminiSummarizer::from_env().context("Failed to create the summarizer")?;

    let state = Arc::new(AppState {
        voice: VoiceController::new(Box::new(agent), AssistantConfig::default()),
        summarizer: Arc::new(summarizer),
    });

    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, router(state))
        .await
        .context("Server terminated")?;

    Ok(())
}
