//! Refresh the Fitbit token, fetch the requested series and render one summary line.

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use fitbit_client::config::Config;
use fitbit_client::http_client::ReqwestFitbitClient;
use fitbit_client::refresher::TokenRefresher;
use fitbit_client::store::FileTokenStore;
use fitbit_client::summary::ActivitySummaryFetcher;

pub mod cli;
pub mod render;

pub use cli::Args;

/// Base log filter: `FITBIT_SUMMARY_LOG_LEVEL`, else `RUST_LOG`, else `warn`.
pub fn log_level() -> String {
    std::env::var("FITBIT_SUMMARY_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string())
}

/// Append per-target overrides so HTTP internals stay quiet.
pub fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    let combined_filter = format!("{level},hyper=warn,hyper_util=warn,reqwest=warn");
    tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,hyper=warn,reqwest=warn"))
}

/// Run once: validate inputs, rotate the token, then fetch and render.
///
/// Configuration problems surface before any request is made.
pub async fn run(config: Config, args: &Args, today: NaiveDate) -> anyhow::Result<String> {
    if args.series.is_empty() {
        bail!("no series requested");
    }
    let range = args.date_range(today).context("invalid date range")?;
    let config_dir = args.config_dir.clone().unwrap_or(config.config_dir);

    let client = Arc::new(
        ReqwestFitbitClient::new(&config.base_url).context("building the HTTP client")?,
    );
    let store = Arc::new(FileTokenStore::new(&config_dir));
    let refresher = TokenRefresher::new(client.clone(), store, config.client_id);

    tracing::info!("refreshing token from {}", config_dir.display());
    let pair = refresher
        .refresh()
        .await
        .context("failed to refresh the Fitbit token")?;

    let summaries = ActivitySummaryFetcher::new(client)
        .fetch(&pair.access_token, range, &args.series)
        .await
        .context("invalid response from the Fitbit API")?;
    Ok(render::render(&summaries))
}
