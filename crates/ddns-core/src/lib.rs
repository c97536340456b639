// # ddns-core
//
// Core library for the zone-wide dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for one update pass:
// - **IpSource**: Trait for discovering the public IPv4 address
// - **DnsProvider**: Trait for listing zones and reading/writing A records
// - **IpCache**: Trait for persisting the last propagated address
// - **Reconciler**: Skip / update / create decision for a single record
// - **DdnsEngine**: Orchestrates IP check → zone enumeration → reconcile → persist
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Run logic is separate from HTTP and storage
// 2. **Explicit Configuration**: One immutable `RunConfig`, passed by parameter
// 3. **Absence Is Not Failure**: Missing records and an empty cache are `None`,
//    never errors
// 4. **Library-First**: The binary is a thin wrapper around `DdnsEngine`

pub mod traits;
pub mod engine;
pub mod reconcile;
pub mod zones;
pub mod config;
pub mod error;
pub mod cache;

// Re-export core types for convenience
pub use traits::{DnsProvider, IpCache, IpSource};
pub use engine::{DdnsEngine, RunReport, RunSummary};
pub use reconcile::{Outcome, Reconciler, SkipReason};
pub use config::{RecordSettings, RunConfig};
pub use error::{Error, Result};
pub use cache::{FileIpCache, MemoryIpCache};
