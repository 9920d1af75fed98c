mod api;
mod console;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// Internal imports
use crate::api::{AskRequest, AskResponse};
use assistant_core::{AppConfig, Brain, Registry, Router};
use assistant_tools::{ExchangeRateClient, OpenMeteoClient};

#[derive(Debug, Parser)]
#[command(name = "assistant", version, about = "Calculator, weather, currency and LLM assistant")]
struct Cli {
    /// Path to config.json (optional, defaults apply when missing)
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the assistant over HTTP instead of the console
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: String,
    },
}

// 1. Define Application State
// One router shared by every request; the gate keeps requests one at a time.
#[derive(Clone)]
struct AppState {
    router: Arc<Router>,
    gate: Arc<Mutex<()>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 2. Logging Setup
    // Console answers go to stdout, so logs stay quiet on stderr unless asked.
    let default_level = if cli.command.is_some() { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    info!("Assistant Initializing...");

    // 3. Load Configuration
    let config = AppConfig::load(&cli.config).await?;

    // 4. Initialize The Brain (LLM fallback)
    let brain = Arc::new(Brain::new(&config.llm)?);

    // 5. Initialize The Tools
    let weather = Arc::new(OpenMeteoClient::new(&config.weather)?);
    let rates = Arc::new(ExchangeRateClient::new(&config.currency)?);
    let registry = Registry::new(&config.ui);
    info!("Loaded {} tools.", registry.records().len());

    let router = Router::new(weather, rates, brain.clone(), config.routing.clone());

    match cli.command {
        None => console::run(&router, &registry).await,
        Some(Command::Serve { addr }) => {
            // Quick connectivity check
            match brain.say_hello().await {
                Ok(msg) => info!("Brain Status: {}", msg),
                Err(e) => warn!("Brain is configured but unresponsive: {}", e),
            }

            let state = AppState {
                router: Arc::new(router),
                gate: Arc::new(Mutex::new(())),
            };
            serve(&addr, state).await
        }
    }
}

fn app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health_check))
        .route("/ask", post(ask))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway listening on {}...", addr);

    axum::serve(listener, app(state))
        .await
        .context("HTTP server stopped")
}

// --- HANDLERS ---

async fn health_check() -> &'static str {
    "Assistant Gateway: Operational"
}

async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    let input = payload.input.trim();
    if input.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "input must not be empty".to_string()));
    }

    let _turn = state.gate.lock().await;
    info!("Question received: {}", input);
    let reply = state.router.respond(input).await;

    Ok(Json(AskResponse::from(reply)))
}
