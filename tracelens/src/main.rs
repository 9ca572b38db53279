use anyhow::Context;
use api::ApiClient;
use args::Args;
use clap::Parser;
use tokio_util::sync::CancellationToken;

mod args;
mod logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(&args.log_filter);

    let config = match &args.config {
        Some(path) => config::Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => config::Config::default(),
    };

    let base_url = args.api_url.as_deref().unwrap_or(&config.api.base_url);
    let client = ApiClient::new(base_url, config.api.request_timeout).context("building the trace store client")?;

    let poll_interval = args.poll_interval.unwrap_or(config.poll.interval);

    log::info!("connecting to trace store at {base_url}");

    let shutdown = CancellationToken::new();
    let version = env!("CARGO_PKG_VERSION").to_string();

    tui::spawn(client, poll_interval, shutdown.clone(), version).await;

    shutdown.cancel();

    Ok(())
}
