//! Test doubles and common utilities for reconciliation contract tests
//!
//! `InMemoryDnsClient` behaves like a hosted-zone provider: commits are
//! all-or-nothing, CREATE fails if the name/type already exists and DELETE
//! only matches a record with identical TTL and values.

#![allow(dead_code)]

use setdns_core::error::{Error, Result};
use setdns_core::traits::DnsClient;
use setdns_core::types::{
    Change, ChangeAction, ChangeStatus, CommitResult, HostedZone, Record, RecordType,
    ResourceRecordSet, ZoneListing,
};
use setdns_core::{ReconcileConfig, ReconcileRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct ZoneState {
    zones: Vec<HostedZone>,
    malformed_listing: bool,
    /// Records keyed by zone id suffix
    records: HashMap<String, Vec<Record>>,
    /// Every accepted change batch, in order
    committed: Vec<Vec<Change>>,
    /// 1-based commit attempt that should be rejected
    reject_commit_attempt: Option<usize>,
    /// Fail record listing with a transport error
    fail_record_listing: bool,
}

/// In-memory hosted-zone provider with shared state and call counters
pub struct InMemoryDnsClient {
    state: Arc<Mutex<ZoneState>>,
    list_zones_calls: Arc<AtomicUsize>,
    list_records_calls: Arc<AtomicUsize>,
    commit_attempts: Arc<AtomicUsize>,
}

impl InMemoryDnsClient {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ZoneState::default())),
            list_zones_calls: Arc::new(AtomicUsize::new(0)),
            list_records_calls: Arc::new(AtomicUsize::new(0)),
            commit_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Client with `nuk9.com.` hosted as `/hostedzone/Z123`
    pub fn with_default_zone() -> Self {
        let client = Self::new();
        client.add_zone("/hostedzone/Z123", "nuk9.com.");
        client
    }

    /// Create a client that shares state and counters with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            state: Arc::clone(&other.state),
            list_zones_calls: Arc::clone(&other.list_zones_calls),
            list_records_calls: Arc::clone(&other.list_records_calls),
            commit_attempts: Arc::clone(&other.commit_attempts),
        }
    }

    pub fn add_zone(&self, raw_id: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.zones.push(HostedZone::new(raw_id, name));
        let suffix = raw_id.rsplit('/').next().unwrap().to_string();
        state.records.entry(suffix).or_default();
    }

    pub fn seed_record(&self, zone_id: &str, record: Record) {
        let mut state = self.state.lock().unwrap();
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(record);
    }

    pub fn set_malformed_listing(&self) {
        self.state.lock().unwrap().malformed_listing = true;
    }

    pub fn reject_commit_attempt(&self, attempt: usize) {
        self.state.lock().unwrap().reject_commit_attempt = Some(attempt);
    }

    pub fn fail_record_listing(&self) {
        self.state.lock().unwrap().fail_record_listing = true;
    }

    /// Records in `zone_id` named `name`
    pub fn records_named(&self, zone_id: &str, name: &str) -> Vec<Record> {
        let state = self.state.lock().unwrap();
        state
            .records
            .get(zone_id)
            .map(|records| records.iter().filter(|r| r.name == name).cloned().collect())
            .unwrap_or_default()
    }

    pub fn committed(&self) -> Vec<Vec<Change>> {
        self.state.lock().unwrap().committed.clone()
    }

    /// Actions of every accepted commit, flattened
    pub fn committed_actions(&self) -> Vec<ChangeAction> {
        self.committed()
            .iter()
            .flat_map(|batch| batch.iter().map(|c| c.action))
            .collect()
    }

    pub fn commit_attempts(&self) -> usize {
        self.commit_attempts.load(Ordering::SeqCst)
    }

    pub fn list_zones_calls(&self) -> usize {
        self.list_zones_calls.load(Ordering::SeqCst)
    }

    pub fn list_records_calls(&self) -> usize {
        self.list_records_calls.load(Ordering::SeqCst)
    }
}

fn apply(records: &mut Vec<Record>, change: &Change) -> std::result::Result<(), String> {
    let record = &change.record;
    match change.action {
        ChangeAction::Create => {
            if records
                .iter()
                .any(|r| r.name == record.name && r.record_type == record.record_type)
            {
                return Err(format!(
                    "Tried to create resource record set {} type {} but it already exists",
                    record.name, record.record_type
                ));
            }
            records.push(record.clone());
        }
        ChangeAction::Delete => {
            let position = records.iter().position(|r| r == record).ok_or_else(|| {
                format!(
                    "Tried to delete resource record set {} type {} but it was not found",
                    record.name, record.record_type
                )
            })?;
            records.remove(position);
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl DnsClient for InMemoryDnsClient {
    async fn list_hosted_zones(&self) -> Result<ZoneListing> {
        self.list_zones_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.malformed_listing {
            return Ok(ZoneListing::malformed());
        }
        Ok(ZoneListing::new(state.zones.clone()))
    }

    async fn list_record_sets(&self, zone_id: &str, name: &str) -> Result<ResourceRecordSet> {
        self.list_records_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.fail_record_listing {
            return Err(Error::provider_request("in-memory", "connection reset"));
        }
        let records = state
            .records
            .get(zone_id)
            .ok_or_else(|| Error::provider_request("in-memory", format!("No such hosted zone {}", zone_id)))?;
        Ok(ResourceRecordSet::new(zone_id, name, records.clone()))
    }

    async fn commit_changes(
        &self,
        set: &ResourceRecordSet,
        changes: &[Change],
    ) -> Result<CommitResult> {
        let attempt = self.commit_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock().unwrap();

        if state.reject_commit_attempt == Some(attempt) {
            return Err(Error::commit("in-memory", "Throttling: Rate exceeded"));
        }

        let current = state
            .records
            .get(&set.zone_id)
            .cloned()
            .ok_or_else(|| Error::commit("in-memory", format!("No such hosted zone {}", set.zone_id)))?;

        // All-or-nothing: apply to a copy, swap in only on success
        let mut next = current;
        for change in changes {
            apply(&mut next, change).map_err(|msg| Error::commit("in-memory", msg))?;
        }
        state.records.insert(set.zone_id.clone(), next);
        state.committed.push(changes.to_vec());

        Ok(CommitResult {
            change_id: format!("C{:04}", attempt),
            status: ChangeStatus::Pending,
            submitted_at: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "in-memory"
    }
}

pub fn a_record(name: &str, value: &str) -> Record {
    Record::new(name, RecordType::A, vec![value.to_string()])
}

/// Config for `<tenant>.nuk9.com.` A record pointing at `ip`
pub fn request_config(tenant: &str, ip: &str) -> ReconcileConfig {
    ReconcileConfig::new(ReconcileRequest::new(tenant, ip).with_cluster("nuk9.com"))
}
