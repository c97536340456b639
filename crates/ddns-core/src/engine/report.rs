//! What a run did
//!
//! The engine returns a [`RunReport`] so callers can summarize or act on the
//! outcome without parsing logs.

use crate::reconcile::Outcome;
use crate::traits::Zone;
use std::fmt;
use std::net::Ipv4Addr;

/// Outcome of one subdomain in one zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    /// Fully-qualified record name
    pub name: String,
    /// What the reconciler did
    pub outcome: Outcome,
}

/// Everything that happened inside one zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneReport {
    /// The zone
    pub zone: Zone,
    /// Records reconciled before the zone finished or failed
    pub records: Vec<RecordReport>,
    /// Set when an error stopped processing of this zone
    pub error: Option<String>,
}

impl ZoneReport {
    pub(crate) fn new(zone: Zone) -> Self {
        Self {
            zone,
            records: Vec::new(),
            error: None,
        }
    }
}

/// Result of [`DdnsEngine::run_once`](super::DdnsEngine::run_once)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// The public IP matched the cache; nothing else was touched
    Unchanged {
        /// Current public IP
        ip: Ipv4Addr,
    },

    /// The IP changed and every zone was processed
    Propagated {
        /// Current public IP
        ip: Ipv4Addr,
        /// Cached IP before the run, if any
        previous: Option<Ipv4Addr>,
        /// Per-zone results, in enumeration order
        zones: Vec<ZoneReport>,
        /// Whether the new IP was written to the cache (false in dry-run)
        persisted: bool,
        /// Writes were only logged, never sent
        dry_run: bool,
    },
}

impl RunReport {
    /// Current public IP
    pub fn ip(&self) -> Ipv4Addr {
        match self {
            RunReport::Unchanged { ip } | RunReport::Propagated { ip, .. } => *ip,
        }
    }

    /// Count outcomes across all zones
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        let RunReport::Propagated { zones, dry_run, .. } = self else {
            return summary;
        };

        summary.dry_run = *dry_run;
        summary.zones = zones.len();
        for zone in zones {
            if zone.error.is_some() {
                summary.failed_zones.push(zone.zone.name.clone());
            }
            for record in &zone.records {
                match record.outcome {
                    Outcome::Updated => summary.updated += 1,
                    Outcome::Created => summary.created += 1,
                    Outcome::Skipped(_) => summary.skipped += 1,
                    Outcome::Failed(_) => summary.failed += 1,
                }
            }
        }

        summary
    }
}

/// Aggregate counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Zones processed
    pub zones: usize,
    /// Records overwritten
    pub updated: usize,
    /// Records created
    pub created: usize,
    /// Records left alone
    pub skipped: usize,
    /// Writes refused by the provider
    pub failed: usize,
    /// Zones whose processing stopped on an error
    pub failed_zones: Vec<String>,
    /// Updated and created count writes that were only logged
    pub dry_run: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (updated, created) = if self.dry_run {
            ("would update", "would create")
        } else {
            ("updated", "created")
        };

        write!(
            f,
            "{} zone(s): {} {}, {} {}, {} skipped, {} failed",
            self.zones, updated, self.updated, created, self.created, self.skipped, self.failed
        )?;

        if self.dry_run {
            f.write_str(" [DRY-RUN]")?;
        }
        if !self.failed_zones.is_empty() {
            write!(f, "; zones with errors: {}", self.failed_zones.join(", "))?;
        }
        Ok(())
    }
}
