//! Transient HTTP clients for remote resources.

use crate::{LoadError, ResourceStream, Result};
use bytes::Bytes;
use reqwest::{header, Client, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Settings applied to every transient client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("rune-io/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn build(&self) -> reqwest::Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .build()
    }
}

fn transport(locator: &Url) -> impl FnOnce(reqwest::Error) -> LoadError + '_ {
    move |source| LoadError::Transport {
        locator: locator.clone(),
        source,
    }
}

/// Issue a GET on a fresh client, returning the client with a successful response.
async fn get(config: &ClientConfig, locator: &Url) -> Result<(Client, Response)> {
    let client = config.build().map_err(transport(locator))?;
    debug!(%locator, "fetching remote resource");

    let response = client
        .get(locator.clone())
        .send()
        .await
        .map_err(transport(locator))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            locator: locator.clone(),
            status: status.as_u16(),
        });
    }

    Ok((client, response))
}

/// Open the response body as a live stream.
pub(crate) async fn open_stream(config: &ClientConfig, locator: &Url) -> Result<ResourceStream> {
    let (client, response) = get(config, locator).await?;
    Ok(ResourceStream::from_response(response, client))
}

/// Fetch the whole body, along with its content type.
pub(crate) async fn fetch_bytes(
    config: &ClientConfig,
    locator: &Url,
) -> Result<(Bytes, Option<String>)> {
    let (_client, response) = get(config, locator).await?;
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let data = response.bytes().await.map_err(transport(locator))?;
    Ok((data, content_type))
}
