//! Core DDNS engine
//!
//! The DdnsEngine is responsible for one update pass:
//! - Resolving the public IP via IpSource
//! - Checking the IpCache to short-circuit unchanged runs
//! - Enumerating zones and reconciling records via DnsProvider
//! - Persisting the new IP once every zone has been processed
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  IpSource   │─── Ipv4Addr ────────┐
//! └─────────────┘                     │
//!                                     ▼
//!                            ┌──────────────┐
//!                            │  DdnsEngine  │
//!                            └──────────────┘
//!                                     │
//!         ┌───────────────────────────┼───────────────────────────┐
//!         │                           │                           │
//!         ▼                           ▼                           ▼
//! ┌─────────────┐           ┌──────────────┐           ┌─────────────┐
//! │  IpCache    │           │ DnsProvider  │           │  RunReport  │
//! │ (compare)   │           │ (reconcile)  │           │  (returned) │
//! └─────────────┘           └──────────────┘           └─────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Resolve the public IP (failure aborts the run)
//! 2. Read the cache; equal → done, nothing else touched
//! 3. List all zones (failure aborts the run, cache untouched)
//! 4. For each zone, for each subdomain: reconcile; an error stops that zone only
//! 5. Write the IP to the cache, whatever the per-record outcomes were. If that
//!    write fails, the summary is logged before the error is returned
//!
//! Everything runs sequentially on the calling task.

mod report;

pub use report::{RecordReport, RunReport, RunSummary, ZoneReport};

use crate::config::RunConfig;
use crate::error::Result;
use crate::reconcile::Reconciler;
use crate::traits::{DnsProvider, IpCache, IpSource, Zone};
use crate::zones;
use std::net::Ipv4Addr;
use tracing::{error, info, warn};

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Call [`DdnsEngine::run_once()`] (typically once per process, from a
///    cron-like scheduler)
/// 3. Drop
pub struct DdnsEngine {
    /// IP source for the public address
    ip_source: Box<dyn IpSource>,

    /// DNS provider for zones and records
    provider: Box<dyn DnsProvider>,

    /// Last propagated IP
    cache: Box<dyn IpCache>,

    /// Run configuration
    config: RunConfig,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if `config` does not validate.
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        cache: Box<dyn IpCache>,
        config: RunConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            provider,
            cache,
            config,
        })
    }

    /// Run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Perform one update pass
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: the run completed, possibly with per-record or
    ///   per-zone failures recorded in the report
    /// - `Err(Error)`: the run was aborted (IP resolution, zone listing or
    ///   cache write failed)
    pub async fn run_once(&self) -> Result<RunReport> {
        let current_ip = self.ip_source.current().await?;
        info!(
            "Public IP: {} (via {})",
            current_ip,
            self.ip_source.source_name()
        );

        let cached_ip = match self.cache.read().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("IP cache unreadable, treating as empty: {}", e);
                None
            }
        };

        if cached_ip == Some(current_ip) {
            info!("IP unchanged ({}), skipping updates", current_ip);
            return Ok(RunReport::Unchanged { ip: current_ip });
        }

        info!(
            "IP changed to {} (cached: {}), updating {} records...",
            current_ip,
            cached_ip.map_or_else(|| "none".to_string(), |ip| ip.to_string()),
            self.provider.provider_name()
        );

        let zones = zones::list_all_zones(self.provider.as_ref()).await?;
        info!("Found {} zone(s)", zones.len());

        let reconciler = Reconciler::new(self.provider.as_ref(), self.config.record);
        let mut reports = Vec::with_capacity(zones.len());
        for zone in zones {
            reports.push(self.process_zone(&reconciler, zone, current_ip).await);
        }

        let mut report = RunReport::Propagated {
            ip: current_ip,
            previous: cached_ip,
            zones: reports,
            persisted: false,
            dry_run: self.config.dry_run,
        };

        if self.config.dry_run {
            info!("[DRY-RUN] Not writing {} to the IP cache", current_ip);
            return Ok(report);
        }

        if let Err(e) = self.cache.write(current_ip).await {
            error!(
                "IP cache write failed after propagating {}: {}",
                current_ip,
                report.summary()
            );
            return Err(e);
        }

        if let RunReport::Propagated { persisted, .. } = &mut report {
            *persisted = true;
        }
        Ok(report)
    }

    /// Reconcile every configured subdomain of one zone
    ///
    /// The first error ends this zone; it is recorded in the report and
    /// never propagated, so later zones are still processed.
    async fn process_zone(
        &self,
        reconciler: &Reconciler<'_>,
        zone: Zone,
        target_ip: Ipv4Addr,
    ) -> ZoneReport {
        let mut report = ZoneReport::new(zone);

        for label in &self.config.subdomains {
            let name = RunConfig::record_name(label, &report.zone.name);

            match reconciler
                .reconcile(
                    &report.zone.id,
                    &name,
                    target_ip,
                    self.config.create_if_missing,
                )
                .await
            {
                Ok(outcome) => report.records.push(RecordReport { name, outcome }),
                Err(e) => {
                    error!("Error processing {}: {}", report.zone.name, e);
                    report.error = Some(e.to_string());
                    break;
                }
            }
        }

        report
    }
}
