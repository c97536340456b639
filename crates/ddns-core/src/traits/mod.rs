//! Core traits for the DDNS updater
//!
//! This module defines the seams between the run logic and the outside world.
//!
//! - [`IpSource`]: discover the public IPv4 address
//! - [`DnsProvider`]: list zones, look up and write A records
//! - [`IpCache`]: persist the last propagated address between runs

pub mod ip_source;
pub mod dns_provider;
pub mod ip_cache;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, ExistingRecord, RecordPayload, Zone, ZonePage};
pub use ip_cache::IpCache;
