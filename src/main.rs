//! api-toolkit command line.
//!
//! # Commands
//!
//! ```text
//! api-toolkit get /users -p role=admin        decoded JSON payload
//! api-toolkit pages /users -p per_page=100    every page, concatenated
//! api-toolkit blob /reports/7 -o report.pdf   raw bytes to a file
//! api-toolkit watch --timeout-minutes 1       run a session timer until it expires
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tokio::sync::Notify;

use api_toolkit::config::{load_or_default, validation::validate_config, ConfigError};
use api_toolkit::http::{ApiClient, QueryParams, RequestOptions};
use api_toolkit::observability::logging::init_tracing;
use api_toolkit::timer::SessionTimer;
use api_toolkit::ui::CountingIndicator;

#[derive(Parser)]
#[command(name = "api-toolkit")]
#[command(about = "Session-aware API client and session timer", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "API_TOOLKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level; RUST_LOG takes precedence.
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a route and print the JSON payload
    Get {
        route: String,
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Fetch every page of a paginated route
    Pages {
        route: String,
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Download a binary route to a file
    Blob {
        route: String,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Run a session timer and log its progress
    Watch {
        #[arg(long)]
        timeout_minutes: Option<f64>,
        #[arg(long)]
        warning_minutes: Option<f64>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

fn options(params: Vec<(String, String)>) -> RequestOptions {
    RequestOptions::with_params(params.into_iter().collect::<QueryParams>())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_or_default(cli.config.as_deref())?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    init_tracing(&level);

    tracing::info!(
        base_url = %config.api.base_url,
        environment = %config.api.environment,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Get { route, params } => {
            let client = ApiClient::new(config.api)?;
            let payload: Value = client.get(&route, &options(params)).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Pages { route, params } => {
            let indicator = Arc::new(CountingIndicator::new());
            let client = ApiClient::builder(config.api)
                .indicator(indicator.clone())
                .build()?;
            let pages = client.get_all_pages::<Value>(&route, &options(params)).await?;
            tracing::info!(
                items = pages.data.len(),
                requests = indicator.ended(),
                "All pages fetched"
            );
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }
        Commands::Blob { route, output, params } => {
            let client = ApiClient::new(config.api)?;
            let response = client.get_blob(&route, &options(params)).await?;
            tokio::fs::write(&output, &response.body).await?;
            tracing::info!(
                path = ?output,
                bytes = response.body.len(),
                content_type = response.content_type().unwrap_or("unknown"),
                "Blob saved"
            );
        }
        Commands::Watch { timeout_minutes, warning_minutes } => {
            if let Some(minutes) = timeout_minutes {
                config.session_timer.timeout_minutes = minutes;
            }
            if let Some(minutes) = warning_minutes {
                config.session_timer.warning_minutes = minutes;
            }
            validate_config(&config).map_err(ConfigError::Validation)?;

            let expired = Arc::new(Notify::new());
            let done = expired.clone();
            let timer = SessionTimer::from_settings(&config.session_timer)
                .on_start(|_| tracing::info!("Session timer started"))
                .on_tick(|snap| {
                    tracing::debug!(
                        elapsed_secs = snap.elapsed.as_secs(),
                        warning_at_secs = snap.warning_target.as_secs(),
                        timeout_at_secs = snap.timeout_target.as_secs(),
                        "Tick"
                    )
                })
                .on_warning(|at| tracing::warn!(at_secs = at.as_secs_f64(), "Session about to expire"))
                .on_timeout(move |at| {
                    tracing::warn!(at_secs = at.as_secs_f64(), "Session expired");
                    done.notify_one();
                })
                .build();

            timer.start();
            tokio::select! {
                _ = expired.notified() => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!(elapsed_secs = timer.elapsed().as_secs(), "Interrupted");
                    timer.stop();
                }
            }
        }
    }

    Ok(())
}
