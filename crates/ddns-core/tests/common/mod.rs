//! Test doubles and common utilities for contract tests
//!
//! The doubles share their state through `Arc`s, so a test can keep a clone
//! for inspection after handing a boxed copy to the engine.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{
    DnsProvider, ExistingRecord, IpCache, IpSource, RecordPayload, Zone, ZonePage,
};
use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource that returns a fixed answer
#[derive(Clone)]
pub struct StaticIpSource {
    ip: Option<Ipv4Addr>,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    /// Always resolves to `ip`
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip: Some(ip),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always fails with a network error
    pub fn unreachable() -> Self {
        Self {
            ip: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.ip
            .ok_or_else(|| Error::network("IP echo service unreachable"))
    }

    fn source_name(&self) -> &str {
        "static"
    }
}

/// A provider call, as recorded by [`MockDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListZones { page: u32, per_page: u32 },
    FindRecord { zone_id: String, name: String },
    Update { zone_id: String, record_id: String, payload: RecordPayload },
    Create { zone_id: String, payload: RecordPayload },
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(self, Call::Update { .. } | Call::Create { .. })
    }
}

#[derive(Default)]
struct ProviderState {
    zones: Vec<Zone>,
    reported_total: Option<usize>,
    /// (zone_id, name) -> records in provider order
    records: HashMap<(String, String), Vec<ExistingRecord>>,
    failing_pages: HashSet<u32>,
    unreachable_zones: HashSet<String>,
    rejecting_lookups: HashSet<String>,
    rejected_names: HashSet<String>,
    calls: Vec<Call>,
    next_id: usize,
}

/// An in-memory DnsProvider that records every call
#[derive(Clone, Default)]
pub struct MockDnsProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone (zones are listed in insertion order)
    pub fn with_zone(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().zones.push(Zone::new(id, name));
        self
    }

    /// Add `count` zones named `zone-N.test`
    pub fn with_zones(self, count: usize) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for i in 0..count {
                state
                    .zones
                    .push(Zone::new(format!("zone-{}", i), format!("zone-{}.test", i)));
            }
        }
        self
    }

    /// Add an existing A record
    pub fn with_record(self, zone_id: &str, name: &str, record_id: &str, content: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .records
            .entry((zone_id.to_string(), name.to_string()))
            .or_default()
            .push(ExistingRecord {
                id: record_id.to_string(),
                content: content.to_string(),
            });
        self
    }

    /// Report `total` in every zone page instead of the real count
    pub fn reporting_total(self, total: usize) -> Self {
        self.state.lock().unwrap().reported_total = Some(total);
        self
    }

    /// Answer zone page `page` with `success: false`
    pub fn failing_page(self, page: u32) -> Self {
        self.state.lock().unwrap().failing_pages.insert(page);
        self
    }

    /// Fail every lookup and write in `zone_id` with a network error
    pub fn unreachable_zone(self, zone_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .unreachable_zones
            .insert(zone_id.to_string());
        self
    }

    /// Answer record lookups in `zone_id` with `success: false`
    pub fn rejecting_lookups_in(self, zone_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .rejecting_lookups
            .insert(zone_id.to_string());
        self
    }

    /// Refuse writes to record `name`
    pub fn rejecting_writes_to(self, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .rejected_names
            .insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn zone_list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListZones { .. }))
            .count()
    }

    /// Current content of the first A record named `name` in `zone_id`
    pub fn content_of(&self, zone_id: &str, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(&(zone_id.to_string(), name.to_string()))
            .and_then(|records| records.first())
            .map(|record| record.content.clone())
    }

    fn rejection(message: &str) -> Error {
        Error::provider_payload(
            "mock",
            message,
            serde_json::json!({
                "success": false,
                "errors": [{"code": 1000, "message": message}],
            }),
        )
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_zones(&self, page: u32, per_page: u32) -> Result<ZonePage> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListZones { page, per_page });

        if state.failing_pages.contains(&page) {
            return Err(Self::rejection("Failed to fetch zones"));
        }

        let start = (page.saturating_sub(1) * per_page) as usize;
        let zones: Vec<Zone> = state
            .zones
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect();

        Ok(ZonePage {
            zones,
            total_count: state.reported_total.unwrap_or(state.zones.len()),
        })
    }

    async fn find_a_record(&self, zone_id: &str, name: &str) -> Result<Option<ExistingRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::FindRecord {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
        });

        if state.unreachable_zones.contains(zone_id) {
            return Err(Error::network("connection reset by peer"));
        }
        if state.rejecting_lookups.contains(zone_id) {
            return Err(Self::rejection("Record lookup failed"));
        }

        Ok(state
            .records
            .get(&(zone_id.to_string(), name.to_string()))
            .and_then(|records| records.first())
            .cloned())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Update {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
            payload: payload.clone(),
        });

        if state.unreachable_zones.contains(zone_id) {
            return Err(Error::network("connection reset by peer"));
        }
        if state.rejected_names.contains(&payload.name) {
            return Err(Self::rejection("Update rejected"));
        }

        if let Some(records) = state
            .records
            .get_mut(&(zone_id.to_string(), payload.name.clone()))
        {
            if let Some(record) = records.iter_mut().find(|r| r.id == record_id) {
                record.content = payload.content.clone();
            }
        }
        Ok(())
    }

    async fn create_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create {
            zone_id: zone_id.to_string(),
            payload: payload.clone(),
        });

        if state.unreachable_zones.contains(zone_id) {
            return Err(Error::network("connection reset by peer"));
        }
        if state.rejected_names.contains(&payload.name) {
            return Err(Self::rejection("Create rejected"));
        }

        state.next_id += 1;
        let id = format!("created-{}", state.next_id);
        state
            .records
            .entry((zone_id.to_string(), payload.name.clone()))
            .or_default()
            .push(ExistingRecord {
                id,
                content: payload.content.clone(),
            });
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An IpCache that counts calls and can be told to fail
#[derive(Clone, Default)]
pub struct RecordingCache {
    ip: Arc<Mutex<Option<Ipv4Addr>>>,
    read_count: Arc<AtomicUsize>,
    write_count: Arc<AtomicUsize>,
    fail_reads: bool,
    fail_writes: bool,
}

impl RecordingCache {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn holding(ip: Ipv4Addr) -> Self {
        let cache = Self::default();
        *cache.ip.lock().unwrap() = Some(ip);
        cache
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn value(&self) -> Option<Ipv4Addr> {
        *self.ip.lock().unwrap()
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpCache for RecordingCache {
    async fn read(&self) -> Result<Option<Ipv4Addr>> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(Error::cache(
                "last_ip.txt",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            ));
        }
        Ok(self.value())
    }

    async fn write(&self, ip: Ipv4Addr) -> Result<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(Error::cache(
                "last_ip.txt",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            ));
        }
        *self.ip.lock().unwrap() = Some(ip);
        Ok(())
    }
}

/// Collects formatted log output while installed as the thread's default
/// subscriber
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route this thread's events into the capture until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn ip(s: &str) -> Ipv4Addr {
    s.parse().expect("valid IPv4 literal")
}
