//! Zone enumeration
//!
//! Walks the provider's paginated zone listing and collects every zone the
//! account owns, in provider order.

use crate::error::Result;
use crate::traits::{DnsProvider, Zone};
use tracing::debug;

/// Page size used against the provider's zone listing
pub const ZONES_PER_PAGE: u32 = 50;

/// Collect every zone of the account
///
/// Any failing page aborts the whole enumeration: no partial list is ever
/// returned and no page is retried.
pub async fn list_all_zones(provider: &dyn DnsProvider) -> Result<Vec<Zone>> {
    list_all_zones_paged(provider, ZONES_PER_PAGE).await
}

/// [`list_all_zones`] with an explicit page size
///
/// Stops once the number of zones collected reaches the provider-reported
/// total. An empty page also stops the walk, so a total that never matches
/// the page contents cannot loop forever.
pub async fn list_all_zones_paged(provider: &dyn DnsProvider, per_page: u32) -> Result<Vec<Zone>> {
    let mut zones = Vec::new();
    let mut page = 1;

    loop {
        let batch = provider.list_zones(page, per_page).await?;
        let fetched = batch.zones.len();
        zones.extend(batch.zones);

        debug!(
            "Zone page {}: {} zone(s), {}/{} collected",
            page,
            fetched,
            zones.len(),
            batch.total_count
        );

        if zones.len() >= batch.total_count || fetched == 0 {
            break;
        }
        page += 1;
    }

    Ok(zones)
}
