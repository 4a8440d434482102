mod api;
mod config;
mod github;
mod query;
mod search;

pub const USER_AGENT: &str = concat!("reposcout/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use config::Config;
use github::GitHubClient;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reposcout=info".parse()?),
        )
        .init();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) => debug!("no environment file loaded: {e}"),
    }

    let config = Config::parse();
    let github = GitHubClient::new(
        config.http_client()?,
        &config.github_api_url,
        github::resolve_token(),
    );

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .inspect_err(|e| tracing::error!("failed to bind {}:{}: {e}", config.host, config.port))?;
    info!(addr = %listener.local_addr()?, "starting reposcout server");

    axum::serve(listener, api::router(github))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for shutdown signal: {e}");
            }
        })
        .await?;

    info!("server stopped");
    Ok(())
}
