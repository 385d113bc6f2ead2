//! Data model shared by the zone locator, the record reconciler and DNS clients
//!
//! All of these are read-only snapshots fetched at the start of a run and
//! dropped at the end of it. Nothing here is cached between invocations.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// TTL applied to records this crate creates, in seconds
pub const DEFAULT_TTL: u32 = 600;

/// DNS record types the reconciler accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ptr,
    Srv,
    Spf,
}

impl RecordType {
    /// Every accepted type, in display order
    pub const ALL: [RecordType; 8] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Txt,
        RecordType::Ptr,
        RecordType::Srv,
        RecordType::Spf,
    ];

    /// Wire token used by DNS providers
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Ptr => "PTR",
            RecordType::Srv => "SRV",
            RecordType::Spf => "SPF",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| {
                let accepted: Vec<&str> = RecordType::ALL.iter().map(|t| t.as_str()).collect();
                Error::invalid_argument(format!(
                    "Unsupported record type '{}'. Must be one of {}",
                    s,
                    accepted.join(", ")
                ))
            })
    }
}

/// A provider-managed namespace of DNS records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    /// Raw provider identifier, possibly path-prefixed (`/hostedzone/Z123`)
    pub id: String,
    /// Fully-qualified zone name with trailing dot (`nuk9.com.`)
    pub name: String,
}

impl HostedZone {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Hosted zones as reported by a DNS client
///
/// `hosted_zones` is `None` when the provider response lacked its top-level
/// zone wrapper, which is distinct from an account with no zones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneListing {
    pub hosted_zones: Option<Vec<HostedZone>>,
}

impl ZoneListing {
    /// A well-formed listing
    pub fn new(zones: Vec<HostedZone>) -> Self {
        Self {
            hosted_zones: Some(zones),
        }
    }

    /// A listing whose wrapper was missing
    pub fn malformed() -> Self {
        Self { hosted_zones: None }
    }
}

/// A single DNS entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Fully-qualified name
    pub name: String,
    pub record_type: RecordType,
    /// Providers match DELETEs on the exact TTL, so it travels with the record
    pub ttl: u32,
    pub values: Vec<String>,
}

impl Record {
    /// Create a record with [`DEFAULT_TTL`]
    pub fn new(name: impl Into<String>, record_type: RecordType, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl: DEFAULT_TTL,
            values,
        }
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Records within one zone matching a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecordSet {
    /// Zone identifier (suffix form, e.g. `Z123`)
    pub zone_id: String,
    /// Logical name the set was fetched for
    pub name: String,
    pub records: Vec<Record>,
}

impl ResourceRecordSet {
    pub fn new(zone_id: impl Into<String>, name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            zone_id: zone_id.into(),
            name: name.into(),
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Kind of change submitted in a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Create,
    Delete,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Create => "CREATE",
            ChangeAction::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intent to create or delete one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub action: ChangeAction,
    pub record: Record,
}

impl Change {
    pub fn new(action: ChangeAction, record: Record) -> Self {
        Self { action, record }
    }
}

/// Propagation status reported for a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeStatus {
    Pending,
    InSync,
}

/// Provider acknowledgement of a committed change batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    /// Provider change identifier
    pub change_id: String,
    pub status: ChangeStatus,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Zone name used for lookup: `<cluster>.`
///
/// Lowercased, matching how hosted zone names are reported.
pub fn zone_fqdn(cluster: &str) -> String {
    let cluster = cluster.trim_end_matches('.');
    format!("{}.", cluster.to_ascii_lowercase())
}

/// Record name used for reconciliation: `<tenant>.<cluster>.`, lowercased
pub fn fqdn(tenant: &str, cluster: &str) -> String {
    format!(
        "{}.{}",
        tenant.trim_end_matches('.').to_ascii_lowercase(),
        zone_fqdn(cluster)
    )
}
