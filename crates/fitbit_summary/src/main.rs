use anyhow::Context;
use clap::Parser;
use fitbit_client::config::Config;
use fitbit_summary::{Args, env_filter, log_level};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // `.env` is optional; anything already in the environment wins.
    let dotenv = dotenvy::dotenv();

    let log_env = log_level();
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter(&log_env))
        .init();
    match dotenv {
        Ok(path) => tracing::debug!("loaded {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("no .env file"),
        Err(e) => tracing::warn!("ignoring unreadable .env: {e}"),
    }

    let args = Args::parse();
    let config = Config::from_env().context("missing configuration")?;
    let today = chrono::Local::now().date_naive();

    let line = fitbit_summary::run(config, &args, today).await?;
    println!("{line}");
    Ok(())
}
