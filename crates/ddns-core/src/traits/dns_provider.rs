// # DNS Provider Trait
//
// Defines the interface to the DNS provider's management API: list the
// account's zones, look up an A record, and write one.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// let page = provider.list_zones(1, 50).await?;
// for zone in &page.zones {
//     if let Some(record) = provider.find_a_record(&zone.id, &zone.name).await? {
//         println!("{} -> {}", zone.name, record.content);
//     }
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// A DNS zone owned by the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Opaque provider id
    pub id: String,
    /// Zone domain, e.g. "example.com"
    pub name: String,
}

impl Zone {
    /// Create a zone
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One page of the provider's zone listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonePage {
    /// Zones on this page, in provider order
    pub zones: Vec<Zone>,
    /// Total number of zones the provider reports for the account
    pub total_count: usize,
}

/// The subset of an existing A record the reconciler needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingRecord {
    /// Provider record id
    pub id: String,
    /// Current record content (the address it points at)
    pub content: String,
}

/// Body of a create or update request for an A record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPayload {
    /// Always "A"
    #[serde(rename = "type")]
    pub record_type: &'static str,
    /// Fully-qualified record name
    pub name: String,
    /// Target IPv4 address
    pub content: String,
    /// Time-to-live (1 = automatic)
    pub ttl: u32,
    /// Proxied through the provider's edge
    pub proxied: bool,
}

impl RecordPayload {
    /// Build an A record payload
    pub fn a_record(
        name: impl Into<String>,
        ip: Ipv4Addr,
        settings: crate::config::RecordSettings,
    ) -> Self {
        Self {
            record_type: "A",
            name: name.into(),
            content: ip.to_string(),
            ttl: settings.ttl,
            proxied: settings.proxied,
        }
    }
}

/// Trait for DNS provider implementations
///
/// Every method performs exactly one HTTP request and no retry. Decisions
/// about *whether* to write belong to the reconciler, not the provider.
///
/// # Errors
///
/// - [`crate::Error::Network`]: transport failure
/// - [`crate::Error::Provider`]: the provider answered with a logical failure;
///   carries the raw payload when one was returned
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch one page of the account's zones (pages are 1-based)
    async fn list_zones(&self, page: u32, per_page: u32) -> Result<ZonePage, crate::Error>;

    /// Find the A record named `name` in zone `zone_id`
    ///
    /// Returns `Ok(None)` when the provider has no such record; absence is
    /// never an error. When several records match, the first is returned.
    async fn find_a_record(
        &self,
        zone_id: &str,
        name: &str,
    ) -> Result<Option<ExistingRecord>, crate::Error>;

    /// Overwrite record `record_id` in zone `zone_id`
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<(), crate::Error>;

    /// Create a new record in zone `zone_id`
    async fn create_record(&self, zone_id: &str, payload: &RecordPayload)
    -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
