use std::time::Duration;

use clap::Parser;
use reqwest::Client;

use crate::github;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum redirect hops before aborting.
const MAX_REDIRECTS: usize = 5;

/// Server configuration. Every flag can also be set through the environment
/// (or a `.env` file in the working directory).
///
/// GitHub credentials are read separately from `GITHUB_TOKEN` / `GH_TOKEN`.
#[derive(Parser, Debug, Clone)]
#[command(name = "reposcout", version, about)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = github::API_BASE)]
    pub github_api_url: String,
}

impl Config {
    pub fn http_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
    }
}
