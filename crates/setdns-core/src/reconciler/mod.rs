//! Record reconciler
//!
//! Fetches the record set for a name, finds an existing record, and applies
//! create / delete / replace changes through a [`DnsClient`].
//!
//! ## Replace Saga
//!
//! A replace is two provider commits, not one transaction:
//!
//! ```text
//!   existing ──DELETE commit──▶ absent ──CREATE commit──▶ new
//!                  │                          │
//!              fails: abort               fails: Error::ReplaceIncomplete
//!              (existing kept)            (record absent)
//! ```
//!
//! The intermediate "absent" state is reported, never compensated.

use crate::error::{Error, Result};
use crate::traits::DnsClient;
use crate::types::{Change, ChangeAction, CommitResult, DEFAULT_TTL, Record, RecordType, ResourceRecordSet};
use tracing::{debug, info};

/// Result of a completed replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// The DELETE that removed the old record
    pub deleted: Change,
    /// Acknowledgement of the CREATE that added the new one
    pub created: CommitResult,
}

/// Create-or-replace logic for a single record
///
/// Borrows the client handle; it holds no state of its own besides the TTL
/// applied to records it creates.
pub struct RecordReconciler<'a> {
    client: &'a dyn DnsClient,
    ttl: u32,
}

impl<'a> RecordReconciler<'a> {
    pub fn new(client: &'a dyn DnsClient) -> Self {
        Self {
            client,
            ttl: DEFAULT_TTL,
        }
    }

    /// TTL for records created by this reconciler
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Fetch the record set for `name` in zone `zone_id`
    pub async fn fetch_record_set(&self, zone_id: &str, name: &str) -> Result<ResourceRecordSet> {
        if zone_id.is_empty() {
            return Err(Error::invalid_argument("Zone id cannot be empty"));
        }
        if name.is_empty() {
            return Err(Error::invalid_argument("Record name cannot be empty"));
        }

        debug!("Fetching record set for {} in zone {}", name, zone_id);
        let set = self.client.list_record_sets(zone_id, name).await?;
        debug!("Fetched {} record(s) for {}", set.len(), name);
        Ok(set)
    }

    /// Find the record named exactly `name`
    ///
    /// Absence is a normal outcome: it selects create over replace.
    pub fn find_record<'s>(set: &'s ResourceRecordSet, name: &str) -> Option<&'s Record> {
        if name.is_empty() {
            return None;
        }
        set.records.iter().find(|record| record.name == name)
    }

    /// Pick the record a create-or-replace of `name`/`record_type` acts on
    ///
    /// A record of the requested type wins over other records sharing the
    /// name, so an `AAAA` request never deletes the name's `A` record while
    /// an `AAAA` is present. Falls back to [`Self::find_record`] when the name
    /// holds no record of that type.
    pub fn select_record<'s>(
        set: &'s ResourceRecordSet,
        name: &str,
        record_type: RecordType,
    ) -> Option<&'s Record> {
        if name.is_empty() {
            return None;
        }
        set.records
            .iter()
            .find(|record| record.name == name && record.record_type == record_type)
            .or_else(|| Self::find_record(set, name))
    }

    /// Commit a single CREATE carrying every value in `values`
    pub async fn create_record(
        &self,
        set: &ResourceRecordSet,
        record_type: RecordType,
        name: &str,
        values: &[String],
    ) -> Result<CommitResult> {
        if name.is_empty() {
            return Err(Error::invalid_argument("Record name cannot be empty"));
        }
        check_values(values)?;

        let record = Record::new(name, record_type, values.to_vec()).with_ttl(self.ttl);
        let change = Change::new(ChangeAction::Create, record);

        let result = self.commit(set, change).await?;
        info!(
            "Created {} record {} -> {}",
            record_type,
            name,
            values.join(",")
        );
        Ok(result)
    }

    /// Commit a DELETE for `record`, matching all of its current values
    ///
    /// Returns the change that was committed.
    pub async fn delete_record(
        &self,
        set: &ResourceRecordSet,
        record: Option<&Record>,
    ) -> Result<Change> {
        let record = check_member(set, record)?;

        let change = Change::new(ChangeAction::Delete, record.clone());
        self.commit(set, change.clone()).await?;
        info!(
            "Deleted {} record {} (was: {})",
            record.record_type,
            record.name,
            record.values.join(",")
        );
        Ok(change)
    }

    /// Delete `existing`, then create `set.name` with the new type and values
    ///
    /// Always performs both commits, even when the new values equal the old
    /// ones. A failed delete aborts before the create. A failed create after
    /// a successful delete yields [`Error::ReplaceIncomplete`].
    pub async fn replace_record(
        &self,
        set: &ResourceRecordSet,
        existing: Option<&Record>,
        new_type: RecordType,
        new_values: &[String],
    ) -> Result<ReplaceOutcome> {
        if set.name.is_empty() {
            return Err(Error::invalid_argument("Record set has no name"));
        }
        check_values(new_values)?;
        check_member(set, existing)?;

        let deleted = self.delete_record(set, existing).await?;

        let created = self
            .create_record(set, new_type, &set.name, new_values)
            .await
            .map_err(|e| Error::ReplaceIncomplete {
                name: set.name.clone(),
                deleted: Box::new(deleted.clone()),
                source: Box::new(e),
            })?;

        Ok(ReplaceOutcome { deleted, created })
    }

    async fn commit(&self, set: &ResourceRecordSet, change: Change) -> Result<CommitResult> {
        debug!(
            "Committing {} {} {} in zone {}",
            change.action, change.record.record_type, change.record.name, set.zone_id
        );
        let result = self
            .client
            .commit_changes(set, std::slice::from_ref(&change))
            .await?;
        debug!("Change {} accepted ({:?})", result.change_id, result.status);
        Ok(result)
    }
}

fn check_values(values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::invalid_argument("At least one record value is required"));
    }
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(Error::invalid_argument("Record values cannot be empty"));
    }
    Ok(())
}

fn check_member<'r>(set: &ResourceRecordSet, record: Option<&'r Record>) -> Result<&'r Record> {
    let record = record.ok_or_else(|| Error::invalid_argument("No record given to delete"))?;

    if record.values.is_empty() {
        return Err(Error::invalid_argument(format!(
            "Record {} has no values to match on delete",
            record.name
        )));
    }
    if !set.records.contains(record) {
        return Err(Error::invalid_argument(format!(
            "Record {} ({}) is not part of the record set for {}",
            record.name, record.record_type, set.name
        )));
    }
    Ok(record)
}
