//! Route 53 REST/XML wire format
//!
//! Response structs deserialize only the elements the client uses; anything
//! else in the document is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setdns_core::types::{
    Change, ChangeStatus, CommitResult, HostedZone, Record, RecordType,
};
use tracing::debug;

/// XML namespace of the 2013-04-01 API
pub const XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";

// ===== ListHostedZones =====

#[derive(Debug, Deserialize)]
pub struct ListHostedZonesResponse {
    #[serde(rename = "HostedZones")]
    pub hosted_zones: Option<HostedZonesWrapper>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextMarker")]
    pub next_marker: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HostedZonesWrapper {
    #[serde(rename = "HostedZone", default)]
    pub hosted_zone: Vec<WireHostedZone>,
}

#[derive(Debug, Deserialize)]
pub struct WireHostedZone {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl From<WireHostedZone> for HostedZone {
    fn from(zone: WireHostedZone) -> Self {
        HostedZone::new(zone.id, zone.name)
    }
}

// ===== ListResourceRecordSets =====

#[derive(Debug, Deserialize)]
pub struct ListResourceRecordSetsResponse {
    #[serde(rename = "ResourceRecordSets")]
    pub resource_record_sets: Option<ResourceRecordSetsWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceRecordSetsWrapper {
    #[serde(rename = "ResourceRecordSet", default)]
    pub resource_record_set: Vec<WireRecordSet>,
}

#[derive(Debug, Deserialize)]
pub struct WireRecordSet {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "TTL")]
    pub ttl: Option<u32>,
    #[serde(rename = "ResourceRecords")]
    pub resource_records: Option<WireResourceRecords>,
}

#[derive(Debug, Deserialize)]
pub struct WireResourceRecords {
    #[serde(rename = "ResourceRecord", default)]
    pub resource_record: Vec<WireResourceRecord>,
}

#[derive(Debug, Deserialize)]
pub struct WireResourceRecord {
    #[serde(rename = "Value")]
    pub value: String,
}

impl WireRecordSet {
    /// Convert to a [`Record`]
    ///
    /// Alias records (no TTL or values) and types the reconciler does not
    /// manage (NS, SOA, CAA, ...) yield `None`.
    pub fn into_record(self) -> Option<Record> {
        let record_type: RecordType = match self.record_type.parse() {
            Ok(t) => t,
            Err(_) => {
                debug!("Skipping {} record {}", self.record_type, self.name);
                return None;
            }
        };
        let (Some(ttl), Some(records)) = (self.ttl, self.resource_records) else {
            debug!("Skipping alias record {}", self.name);
            return None;
        };
        let values = records
            .resource_record
            .into_iter()
            .map(|rr| rr.value)
            .collect();

        Some(Record::new(self.name, record_type, values).with_ttl(ttl))
    }
}

// ===== ChangeResourceRecordSets =====

#[derive(Debug, Serialize)]
pub struct ChangeResourceRecordSetsRequest {
    #[serde(rename = "ChangeBatch")]
    pub change_batch: ChangeBatch,
}

#[derive(Debug, Serialize)]
pub struct ChangeBatch {
    #[serde(rename = "Comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "Changes")]
    pub changes: WireChanges,
}

#[derive(Debug, Serialize)]
pub struct WireChanges {
    #[serde(rename = "Change")]
    pub change: Vec<WireChange>,
}

#[derive(Debug, Serialize)]
pub struct WireChange {
    #[serde(rename = "Action")]
    pub action: &'static str,
    #[serde(rename = "ResourceRecordSet")]
    pub resource_record_set: WireChangeRecordSet,
}

#[derive(Debug, Serialize)]
pub struct WireChangeRecordSet {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: &'static str,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(rename = "ResourceRecords")]
    pub resource_records: WireChangeRecords,
}

#[derive(Debug, Serialize)]
pub struct WireChangeRecords {
    #[serde(rename = "ResourceRecord")]
    pub resource_record: Vec<WireChangeRecord>,
}

#[derive(Debug, Serialize)]
pub struct WireChangeRecord {
    #[serde(rename = "Value")]
    pub value: String,
}

impl From<&Change> for WireChange {
    fn from(change: &Change) -> Self {
        let record = &change.record;
        WireChange {
            action: change.action.as_str(),
            resource_record_set: WireChangeRecordSet {
                name: record.name.clone(),
                record_type: record.record_type.as_str(),
                ttl: record.ttl,
                resource_records: WireChangeRecords {
                    resource_record: record
                        .values
                        .iter()
                        .map(|value| WireChangeRecord {
                            value: value.clone(),
                        })
                        .collect(),
                },
            },
        }
    }
}

impl ChangeResourceRecordSetsRequest {
    pub fn new(comment: Option<String>, changes: &[Change]) -> Self {
        Self {
            change_batch: ChangeBatch {
                comment,
                changes: WireChanges {
                    change: changes.iter().map(WireChange::from).collect(),
                },
            },
        }
    }

    /// Serialize with the API namespace on the root element
    pub fn to_xml(&self) -> Result<String, quick_xml::DeError> {
        let body = quick_xml::se::to_string(self)?;
        Ok(body.replacen(
            "<ChangeResourceRecordSetsRequest>",
            &format!("<ChangeResourceRecordSetsRequest xmlns=\"{}\">", XMLNS),
            1,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeResourceRecordSetsResponse {
    #[serde(rename = "ChangeInfo")]
    pub change_info: ChangeInfo,
}

#[derive(Debug, Deserialize)]
pub struct ChangeInfo {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "SubmittedAt")]
    pub submitted_at: Option<String>,
}

impl From<ChangeInfo> for CommitResult {
    fn from(info: ChangeInfo) -> Self {
        let status = match info.status.as_str() {
            "INSYNC" => ChangeStatus::InSync,
            _ => ChangeStatus::Pending,
        };
        let submitted_at = info
            .submitted_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));
        let change_id = info
            .id
            .rsplit('/')
            .next()
            .unwrap_or(info.id.as_str())
            .to_string();

        CommitResult {
            change_id,
            status,
            submitted_at,
        }
    }
}

// ===== Errors =====

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct InvalidChangeBatch {
    #[serde(rename = "Messages")]
    pub messages: InvalidChangeBatchMessages,
}

#[derive(Debug, Deserialize)]
pub struct InvalidChangeBatchMessages {
    #[serde(rename = "Message", default)]
    pub message: Vec<String>,
}

/// Best-effort summary of an error body: `Code: Message`, or the raw text
pub fn describe_error(body: &str) -> String {
    if let Ok(parsed) = quick_xml::de::from_str::<ErrorResponse>(body) {
        return format!("{}: {}", parsed.error.code, parsed.error.message);
    }
    if body.contains("<InvalidChangeBatch")
        && let Ok(parsed) = quick_xml::de::from_str::<InvalidChangeBatch>(body)
    {
        return format!("InvalidChangeBatch: {}", parsed.messages.message.join("; "));
    }
    body.trim().to_string()
}
