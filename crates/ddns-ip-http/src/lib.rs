// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS updater.
//
// ## Architecture
//
// One GET against a plain-text IP echo service (e.g. api.ipify.org,
// icanhazip.com) per call to `current()`. No caching and no retry; the
// engine calls it once per run.

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Default HTTP timeout for the echo service (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IPv4 source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL answering with the caller's address as plain text
    ///   (e.g., "https://api.ipify.org")
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Echo service URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "{} answered with HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        let ip = parse_ip_body(&body)?;
        tracing::debug!("{} reports {}", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}

/// Parse an echo service body into an IPv4 address
///
/// Surrounding whitespace (typically a trailing newline) is ignored.
pub fn parse_ip_body(body: &str) -> Result<Ipv4Addr> {
    let text = body.trim();

    match text.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => Ok(ip),
        Ok(IpAddr::V6(ip)) => Err(Error::ip_source(format!("Expected IPv4, got: {}", ip))),
        Err(_) => Err(Error::ip_source(format!("Invalid IP address: {:?}", text))),
    }
}
