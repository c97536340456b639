//! Configuration types for the DDNS updater
//!
//! A [`RunConfig`] is built once at process start and handed by reference to
//! every component. Nothing reads configuration from ambient state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Label meaning "the bare zone domain"
pub const APEX_LABEL: &str = "@";

/// Default public-IP echo endpoint
pub const DEFAULT_IP_ECHO_URL: &str = "https://api.ipify.org";

/// Default Cloudflare API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default IP cache file
pub const DEFAULT_IP_CACHE_PATH: &str = "last_ip.txt";

/// Main run configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Provider API token
    /// ⚠️ NEVER log this value
    #[serde(skip_serializing, default)]
    pub api_token: String,

    /// Labels to update in every zone, in order ("@" = bare domain)
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,

    /// Create the A record when a zone has none for a label
    #[serde(default)]
    pub create_if_missing: bool,

    /// Where the last propagated IP is kept
    #[serde(default = "default_ip_cache_path")]
    pub ip_cache_path: PathBuf,

    /// Public-IP echo endpoint
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,

    /// Provider API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Settings written into every created/updated record
    #[serde(default)]
    pub record: RecordSettings,

    /// Perform lookups only; log writes instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("api_token", &"<REDACTED>")
            .field("subdomains", &self.subdomains)
            .field("create_if_missing", &self.create_if_missing)
            .field("ip_cache_path", &self.ip_cache_path)
            .field("ip_echo_url", &self.ip_echo_url)
            .field("api_base_url", &self.api_base_url)
            .field("record", &self.record)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl RunConfig {
    /// Create a configuration with defaults for everything but the token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            subdomains: default_subdomains(),
            create_if_missing: false,
            ip_cache_path: default_ip_cache_path(),
            ip_echo_url: default_ip_echo_url(),
            api_base_url: default_api_base_url(),
            record: RecordSettings::default(),
            dry_run: false,
        }
    }

    /// Set the subdomain labels
    pub fn with_subdomains<I, S>(mut self, subdomains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdomains = subdomains.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable record creation
    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    /// Set the IP cache path
    pub fn with_ip_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ip_cache_path = path.into();
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the configuration
    ///
    /// The API token is not checked here; a run whose IP is unchanged never
    /// uses it.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.subdomains.is_empty() {
            return Err(crate::Error::config("No subdomains configured"));
        }

        for label in &self.subdomains {
            validate_label(label)?;
        }

        validate_url("IP echo URL", &self.ip_echo_url)?;
        validate_url("API base URL", &self.api_base_url)?;
        self.record.validate()?;

        Ok(())
    }

    /// Fully-qualified record name for `label` inside `zone_name`
    pub fn record_name(label: &str, zone_name: &str) -> String {
        if label == APEX_LABEL {
            zone_name.to_string()
        } else {
            format!("{}.{}", label, zone_name)
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Settings applied to every record the updater writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSettings {
    /// Time-to-live; 1 means "automatic" at Cloudflare
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Route traffic through the provider's edge
    #[serde(default = "default_proxied")]
    pub proxied: bool,
}

impl RecordSettings {
    fn validate(&self) -> Result<(), crate::Error> {
        if self.ttl != 1 && !(60..=86400).contains(&self.ttl) {
            return Err(crate::Error::config(format!(
                "Record TTL must be 1 (automatic) or between 60 and 86400. Got: {}",
                self.ttl
            )));
        }
        Ok(())
    }
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            proxied: default_proxied(),
        }
    }
}

/// Validate a subdomain label: "@" or one or more dot-separated DNS labels
fn validate_label(label: &str) -> Result<(), crate::Error> {
    if label == APEX_LABEL {
        return Ok(());
    }

    if label.is_empty() {
        return Err(crate::Error::config("Subdomain label cannot be empty"));
    }

    if label.len() > 253 {
        return Err(crate::Error::config(format!(
            "Subdomain too long: {} chars (max 253). Got: {}",
            label.len(),
            label
        )));
    }

    for part in label.split('.') {
        if part.is_empty() {
            return Err(crate::Error::config(format!(
                "Subdomain has empty label: '{}'",
                label
            )));
        }

        if part.len() > 63 {
            return Err(crate::Error::config(format!(
                "Subdomain label too long: {} chars (max 63). Label: '{}'",
                part.len(),
                part
            )));
        }

        // "*" is accepted as a whole label for wildcard records
        if part != "*" && !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(crate::Error::config(format!(
                "Subdomain label contains invalid characters. Label: '{}'",
                part
            )));
        }

        if part.starts_with('-') || part.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Subdomain label cannot start or end with hyphen. Label: '{}'",
                part
            )));
        }
    }

    Ok(())
}

fn validate_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", what)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

fn default_subdomains() -> Vec<String> {
    vec![APEX_LABEL.to_string()]
}

fn default_ip_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_IP_CACHE_PATH)
}

fn default_ip_echo_url() -> String {
    DEFAULT_IP_ECHO_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_ttl() -> u32 {
    1
}

fn default_proxied() -> bool {
    true
}
