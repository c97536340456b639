//! Process settings read from the environment
//!
//! Every variable is optional; see the crate documentation for the table of
//! names and defaults. Parsing goes through a lookup function so it can be
//! exercised without touching the process environment.

use anyhow::{Context, Result};
use ddns_core::RunConfig;
use std::env;
use tracing::Level;

/// Everything the binary needs to start a run
#[derive(Debug)]
pub struct Settings {
    /// Configuration handed to the engine
    pub run: RunConfig,

    /// Value of `DDNS_LOG_LEVEL`
    pub log_level: String,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`, which returns a variable's value if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut run = RunConfig::new(lookup("CLOUDFLARE_API_TOKEN").unwrap_or_default());

        if let Some(raw) = lookup("DDNS_SUBDOMAINS") {
            run.subdomains = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(raw) = lookup("DDNS_CREATE_IF_MISSING") {
            run.create_if_missing = parse_bool("DDNS_CREATE_IF_MISSING", &raw)?;
        }

        if let Some(path) = lookup("DDNS_IP_CACHE_PATH") {
            run.ip_cache_path = path.into();
        }

        if let Some(url) = lookup("DDNS_IP_ECHO_URL") {
            run.ip_echo_url = url;
        }

        if let Some(url) = lookup("DDNS_API_BASE_URL") {
            run.api_base_url = url;
        }

        if let Some(raw) = lookup("DDNS_RECORD_TTL") {
            run.record.ttl = raw
                .trim()
                .parse()
                .with_context(|| format!("DDNS_RECORD_TTL must be a number. Got: {}", raw))?;
        }

        if let Some(raw) = lookup("DDNS_RECORD_PROXIED") {
            run.record.proxied = parse_bool("DDNS_RECORD_PROXIED", &raw)?;
        }

        if let Some(raw) = lookup("DDNS_MODE") {
            run.dry_run = parse_mode(&raw)?;
        }

        Ok(Self {
            run,
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        self.run.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Tracing level for `DDNS_LOG_LEVEL`
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be true or false. Got: {}", name, raw),
    }
}

/// `true` for dry-run, `false` for live; blank means live
fn parse_mode(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "" | "live" => Ok(false),
        "dry-run" => Ok(true),
        _ => anyhow::bail!("DDNS_MODE must be live or dry-run. Got: {}", raw),
    }
}
