// # File IP Cache
//
// File-based implementation of IpCache.
//
// ## File Format
//
// Plain text holding exactly the last propagated IPv4 address, nothing else:
//
// ```text
// 1.2.3.4
// ```
//
// Surrounding whitespace is trimmed on read, so a file edited by hand with a
// trailing newline still works.
//
// ## Writes
//
// - Atomic: the address is written to `<path>.tmp`, then renamed over `<path>`
// - Parent directories are created on first write

use async_trait::async_trait;
use std::ffi::OsString;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::IpCache;

/// File-based IP cache
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::cache::FileIpCache;
/// use ddns_core::traits::IpCache;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = FileIpCache::new("last_ip.txt");
///
///     cache.write("1.2.3.4".parse()?).await?;
///     assert_eq!(cache.read().await?, Some("1.2.3.4".parse()?));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileIpCache {
    path: PathBuf,
}

impl FileIpCache {
    /// Create a cache backed by `path`; nothing is touched until the first
    /// read or write
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Parse cached file content
    ///
    /// Content that is not an IPv4 address is treated as "nothing cached",
    /// which forces a full update pass.
    fn parse(&self, content: &str) -> Option<Ipv4Addr> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        match content.parse() {
            Ok(ip) => Some(ip),
            Err(_) => {
                tracing::warn!(
                    "Ignoring unparseable IP cache content in {}: {:?}",
                    self.path.display(),
                    content
                );
                None
            }
        }
    }
}

#[async_trait]
impl IpCache for FileIpCache {
    async fn read(&self) -> Result<Option<Ipv4Addr>, Error> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(self.parse(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("IP cache file does not exist: {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(Error::cache(&self.path, e)),
        }
    }

    async fn write(&self, ip: Ipv4Addr) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::cache(parent, e))?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path)
                .await
                .map_err(|e| Error::cache(&temp_path, e))?;

            file.write_all(ip.to_string().as_bytes())
                .await
                .map_err(|e| Error::cache(&temp_path, e))?;

            file.flush().await.map_err(|e| Error::cache(&temp_path, e))?;
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::cache(&self.path, e))?;

        tracing::trace!("IP cache written: {}", self.path.display());
        Ok(())
    }
}
