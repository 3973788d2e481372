use std::io::Read;
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::error::{Error, Result};

/// How requests reach the network.
///
/// Certificate validation is controlled here and nowhere else; the client
/// built from it is handed to every component that fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            accept_invalid_certs: true,
            user_agent: None,
        }
    }
}

/// Opens a URL as a byte stream
pub trait Fetch {
    fn open(&self, url: &str) -> Result<Box<dyn Read>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        // No request timeout: a stalled server stalls the run
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(None::<Duration>);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder.build().map_err(Error::Client)?;
        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    fn open(&self, url: &str) -> Result<Box<dyn Read>> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(Box::new(response))
    }
}

/// Join a base URL and a relative path with exactly one `/` between them
pub fn join_url(base: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Drop the last path segment of a URL, along with its leading `/`.
///
/// A URL ending in `/` already names a directory and is returned unchanged,
/// as is a bare `scheme://host`.
pub fn parent_url(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) if idx + 1 < url.len() && !url[..idx].ends_with('/') => &url[..idx],
        _ => url,
    }
}
