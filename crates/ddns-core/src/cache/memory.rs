// # Memory IP Cache
//
// In-memory implementation of IpCache.
//
// Nothing survives the process, so every new process starts with an empty
// cache and performs a full update pass. Useful for tests and for embedding
// the engine in a long-lived program that keeps its own state.

use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::IpCache;

/// In-memory IP cache
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryIpCache {
    inner: Arc<RwLock<Option<Ipv4Addr>>>,
}

impl MemoryIpCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with `ip`
    pub fn with_ip(ip: Ipv4Addr) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(ip))),
        }
    }
}

#[async_trait]
impl IpCache for MemoryIpCache {
    async fn read(&self) -> Result<Option<Ipv4Addr>, Error> {
        Ok(*self.inner.read().await)
    }

    async fn write(&self, ip: Ipv4Addr) -> Result<(), Error> {
        *self.inner.write().await = Some(ip);
        Ok(())
    }
}
