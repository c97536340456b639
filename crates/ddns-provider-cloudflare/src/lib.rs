// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare v4 implementation of `DnsProvider`.
//
// ## Behavior
//
// - One HTTP request per trait call, no retry, no backoff
// - HTTP timeout configured (30 seconds)
// - Non-2xx statuses and `success: false` envelopes become `Error::Provider`
//   carrying the raw body; transport failures become `Error::Network`
// - Dry-run mode: GET requests are sent, PUT/POST payloads are only logged
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?page=N&per_page=50`
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=A&name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`

pub mod response;

use async_trait::async_trait;
use ddns_core::traits::{DnsProvider, ExistingRecord, RecordPayload, ZonePage};
use ddns_core::{Error, Result};
use reqwest::{Method, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (zone listing, record lookup)
/// - Log the intended PUT/POST payload
/// - **NOT** actually modify DNS records, and report the write as successful
///
/// # Security
///
/// The Debug implementation does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL, without trailing slash
    api_base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("api_base_url", &self.api_base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Read and DNS:Edit permissions
    /// - `api_base_url`: API root, normally `https://api.cloudflare.com/client/v4`
    /// - `dry_run`: If true, perform GET requests but skip PUT/POST
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(
        api_token: impl Into<String>,
        api_base_url: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();

        if dry_run {
            tracing::warn!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            api_token: api_token.into(),
            api_base_url,
            client,
            dry_run,
        })
    }

    /// Whether writes are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Start an authenticated request against `path`
    ///
    /// The content type is set here, before any body, so `.json()` leaves it
    /// alone and the request carries a single `Content-Type`.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send a request and check the response envelope
    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::network(format!("{}: HTTP request failed: {}", action, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("{}: failed to read response: {}", action, e)))?;

        tracing::debug!("{} answered with status {}", action, status);
        response::check_envelope(status.as_u16(), &body, action)
    }

    /// Log a write instead of sending it
    fn log_dry_run(&self, method: &str, url: &str, payload: &RecordPayload) -> Result<()> {
        tracing::info!(
            "[DRY-RUN] Would send {} request to {} with payload: {}",
            method,
            url,
            serde_json::to_string(payload)?
        );
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// ```http
    /// GET /zones?page=N&per_page=50
    /// Authorization: Bearer <token>
    /// ```
    async fn list_zones(&self, page: u32, per_page: u32) -> Result<ZonePage> {
        tracing::debug!("Listing zones: page {} ({} per page)", page, per_page);

        let request = self
            .request(Method::GET, "/zones")
            .query(&[("page", page), ("per_page", per_page)]);

        let json = self.send(request, "zone list").await?;
        response::parse_zone_page(&json)
    }

    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&name=www.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn find_a_record(&self, zone_id: &str, name: &str) -> Result<Option<ExistingRecord>> {
        tracing::debug!("Looking up A record: {}", name);

        let request = self
            .request(Method::GET, &format!("/zones/{}/dns_records", zone_id))
            .query(&[("type", "A"), ("name", name)]);

        let json = self.send(request, "record lookup").await?;
        response::parse_first_record(&json)
    }

    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {"type": "A", "name": "...", "content": "1.2.3.4", "ttl": 1, "proxied": true}
    /// ```
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<()> {
        let path = format!("/zones/{}/dns_records/{}", zone_id, record_id);

        if self.dry_run {
            return self.log_dry_run("PUT", &self.url(&path), payload);
        }

        let request = self.request(Method::PUT, &path).json(payload);
        self.send(request, "record update").await?;
        Ok(())
    }

    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// {"type": "A", "name": "...", "content": "1.2.3.4", "ttl": 1, "proxied": true}
    /// ```
    async fn create_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<()> {
        let path = format!("/zones/{}/dns_records", zone_id);

        if self.dry_run {
            return self.log_dry_run("POST", &self.url(&path), payload);
        }

        let request = self.request(Method::POST, &path).json(payload);
        self.send(request, "record create").await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddns_core::config::RecordSettings;
    use std::net::Ipv4Addr;

    // Nothing listens here; any request that is actually sent fails
    const DEAD_BASE_URL: &str = "http://127.0.0.1:9";

    fn payload() -> RecordPayload {
        RecordPayload::a_record(
            "www.example.com",
            Ipv4Addr::new(1, 2, 3, 4),
            RecordSettings::default(),
        )
    }

    #[test]
    fn test_dry_run_mode() {
        let provider_dry = CloudflareProvider::new("token", DEAD_BASE_URL, true).unwrap();
        let provider_live = CloudflareProvider::new("token", DEAD_BASE_URL, false).unwrap();

        assert!(provider_dry.is_dry_run());
        assert!(!provider_live.is_dry_run());
    }

    #[test]
    fn test_provider_name() {
        let provider = CloudflareProvider::new("token", DEAD_BASE_URL, false).unwrap();
        assert_eq!(provider.provider_name(), "cloudflare");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let provider =
            CloudflareProvider::new("token", "https://api.cloudflare.com/client/v4/", false)
                .unwrap();
        assert_eq!(
            provider.url("/zones"),
            "https://api.cloudflare.com/client/v4/zones"
        );
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let provider =
            CloudflareProvider::new("secret_token_12345", DEAD_BASE_URL, false).unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("<REDACTED>"));
        assert!(debug_str.contains("CloudflareProvider"));
    }

    #[tokio::test]
    async fn test_dry_run_writes_are_not_sent() {
        let provider = CloudflareProvider::new("token", DEAD_BASE_URL, true).unwrap();

        provider.update_record("z1", "r1", &payload()).await.unwrap();
        provider.create_record("z1", &payload()).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        let provider = CloudflareProvider::new("token", DEAD_BASE_URL, false).unwrap();

        let err = provider.list_zones(1, 50).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert!(!err.is_provider_rejection());
    }
}
