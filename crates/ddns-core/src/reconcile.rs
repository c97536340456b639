//! Record resolution and reconciliation
//!
//! The [`Reconciler`] compares the desired address of one record with what
//! the provider currently holds and issues at most one write to close the
//! gap.
//!
//! ## Decision table
//!
//! Evaluated in order:
//!
//! | existing record          | `create_if_missing` | action                   |
//! |--------------------------|---------------------|--------------------------|
//! | none                     | false               | skip (creation disabled) |
//! | content == target        | any                 | skip (unchanged)         |
//! | content != target        | any                 | PUT                      |
//! | none                     | true                | POST                     |

use crate::config::RecordSettings;
use crate::error::Result;
use crate::traits::{DnsProvider, ExistingRecord, RecordPayload};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::{debug, info, warn};

/// Why a record was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The record already points at the target address
    Unchanged,
    /// No record exists and creation is disabled
    AbsentCreationDisabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unchanged => f.write_str("unchanged"),
            SkipReason::AbsentCreationDisabled => f.write_str("record absent, creation disabled"),
        }
    }
}

/// Result of reconciling one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No write was issued
    Skipped(SkipReason),
    /// Existing record overwritten
    Updated,
    /// New record created
    Created,
    /// The provider refused the write; carries its error body
    Failed(String),
}

impl Outcome {
    /// Whether this outcome issued a successful write
    pub fn is_write(&self) -> bool {
        matches!(self, Outcome::Updated | Outcome::Created)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            Outcome::Updated => f.write_str("updated"),
            Outcome::Created => f.write_str("created"),
            Outcome::Failed(detail) => write!(f, "failed: {}", detail),
        }
    }
}

/// Reconciles A records against a target address through a [`DnsProvider`]
pub struct Reconciler<'a> {
    provider: &'a dyn DnsProvider,
    settings: RecordSettings,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler writing records with `settings`
    pub fn new(provider: &'a dyn DnsProvider, settings: RecordSettings) -> Self {
        Self { provider, settings }
    }

    /// Look up the existing A record for `full_name` in `zone_id`
    ///
    /// `Ok(None)` means the zone has no such record; that is a normal
    /// answer, not a failure.
    pub async fn find_a_record(
        &self,
        zone_id: &str,
        full_name: &str,
    ) -> Result<Option<ExistingRecord>> {
        self.provider.find_a_record(zone_id, full_name).await
    }

    /// Bring the A record `full_name` in `zone_id` to `target_ip`
    ///
    /// Issues zero or one write. A provider rejection of the write becomes
    /// [`Outcome::Failed`]; transport errors and lookup failures are returned
    /// as `Err` for the caller to handle at the zone level.
    pub async fn reconcile(
        &self,
        zone_id: &str,
        full_name: &str,
        target_ip: Ipv4Addr,
        create_if_missing: bool,
    ) -> Result<Outcome> {
        let existing = self.find_a_record(zone_id, full_name).await?;

        let record_id = match existing {
            None if !create_if_missing => {
                warn!(
                    "Record for {} does not exist. Skipping (creation disabled)",
                    full_name
                );
                return Ok(Outcome::Skipped(SkipReason::AbsentCreationDisabled));
            }
            Some(record) if record.content.trim() == target_ip.to_string() => {
                info!("No update needed for {}, IP unchanged", full_name);
                return Ok(Outcome::Skipped(SkipReason::Unchanged));
            }
            Some(record) => {
                debug!(
                    "Record {} ({}) points at {}, target {}",
                    full_name, record.id, record.content, target_ip
                );
                Some(record.id)
            }
            None => None,
        };

        let payload = RecordPayload::a_record(full_name, target_ip, self.settings);

        let (written, outcome) = match record_id {
            Some(id) => (
                self.provider.update_record(zone_id, &id, &payload).await,
                Outcome::Updated,
            ),
            None => {
                info!("Creating new A record for {}", full_name);
                (
                    self.provider.create_record(zone_id, &payload).await,
                    Outcome::Created,
                )
            }
        };

        match written {
            Ok(()) => {
                info!("{} record for {} -> {}", outcome_verb(&outcome), full_name, target_ip);
                Ok(outcome)
            }
            Err(e) if e.is_provider_rejection() => {
                let detail = e.detail();
                warn!("Error updating {}: {}", full_name, detail);
                Ok(Outcome::Failed(detail))
            }
            Err(e) => Err(e),
        }
    }
}

fn outcome_verb(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Created => "Created",
        _ => "Updated",
    }
}
