use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("cricpredict/", env!("CARGO_PKG_VERSION"));

/// `None` disables the request timeout entirely; reqwest's blocking client
/// would otherwise apply its own 30 s default.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build http client")
}
