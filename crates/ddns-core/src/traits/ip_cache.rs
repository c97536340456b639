// # IP Cache Trait
//
// Defines the interface for the single persisted value shared between runs:
// the last IPv4 address the updater tried to propagate.
//
// ## Purpose
//
// The cache makes repeated runs cheap: when the public IP matches the cached
// value, a run ends before touching the provider at all.
//
// ## Implementations
//
// - File-based: plain-text file holding just the address
// - In-memory: for tests and embedding

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP cache implementations
///
/// Only one process is expected to use a cache at a time; implementations
/// do no cross-process locking.
#[async_trait]
pub trait IpCache: Send + Sync {
    /// Read the cached address
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ip))`: the last propagated address
    /// - `Ok(None)`: nothing cached yet (never an error)
    /// - `Err(Error)`: the slot exists but could not be read
    async fn read(&self) -> Result<Option<Ipv4Addr>, crate::Error>;

    /// Overwrite the cached address
    async fn write(&self, ip: Ipv4Addr) -> Result<(), crate::Error>;
}
