//! Reconciliation engine
//!
//! The ReconcileEngine drives one run:
//! - Resolves the zone id for `<cluster>.`
//! - Fetches the record set for `<tenant>.<cluster>.`
//! - Creates the record if absent, replaces it if present
//!
//! ## Architecture
//!
//! ```text
//!                   ┌──────────────────┐
//!                   │ ReconcileEngine  │
//!                   └──────────────────┘
//!                            │
//!         ┌──────────────────┼──────────────────┐
//!         │                  │                  │
//!         ▼                  ▼                  ▼
//! ┌──────────────┐  ┌──────────────────┐  ┌─────────────┐
//! │ find_zone    │  │ RecordReconciler │  │   Events    │
//! │ (pure)       │  │ (DnsClient)      │  │  (notify)   │
//! └──────────────┘  └──────────────────┘  └─────────────┘
//! ```
//!
//! ## Decision Policy
//!
//! 1. Record name is `<tenant>.<cluster>.`
//! 2. Zone is located by `<cluster>.`
//! 3. Record set is fetched for that zone
//! 4. No record with that exact name → CREATE with the requested value
//! 5. Record present → DELETE then CREATE, even if the value is unchanged
//!
//! Any error aborts the run. Nothing is retried or compensated.

use crate::config::{ReconcileConfig, ReconcileRequest};
use crate::error::{Error, Result};
use crate::reconciler::RecordReconciler;
use crate::traits::DnsClient;
use crate::types::{CommitResult, Record, fqdn, zone_fqdn};
use crate::zone::find_zone;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the ReconcileEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Run started
    Started { record_name: String, zone_name: String },

    /// Zone id resolved
    ZoneResolved { zone_name: String, zone_id: String },

    /// Record set fetched
    RecordSetFetched { record_name: String, records: usize },

    /// Record created (no previous record)
    RecordCreated { record_name: String, values: Vec<String> },

    /// Old record deleted as the first half of a replace
    RecordDeleted { record_name: String, values: Vec<String> },

    /// Replace completed
    RecordReplaced {
        record_name: String,
        previous: Vec<String>,
        values: Vec<String>,
    },

    /// Run failed
    Failed { record_name: String, error: String },
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No record existed; one was created
    Created {
        record_name: String,
        commit: CommitResult,
    },
    /// A record existed; it was deleted and recreated
    Replaced {
        record_name: String,
        previous: Record,
        commit: CommitResult,
    },
}

impl ReconcileOutcome {
    pub fn record_name(&self) -> &str {
        match self {
            ReconcileOutcome::Created { record_name, .. }
            | ReconcileOutcome::Replaced { record_name, .. } => record_name,
        }
    }
}

/// One-shot reconciliation engine
///
/// ## Lifecycle
///
/// 1. Create with [`ReconcileEngine::new()`]
/// 2. Call [`ReconcileEngine::run()`] once per invocation
/// 3. Drain the event receiver for progress reporting
///
/// ## Concurrency
///
/// Provider calls are awaited one after another. The engine assumes nothing
/// else is editing the same record during a run.
pub struct ReconcileEngine {
    /// DNS client handle
    client: Box<dyn DnsClient>,

    /// Record to converge on
    request: ReconcileRequest,

    /// TTL for created records
    ttl: u32,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl ReconcileEngine {
    /// Create a new engine
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        client: Box<dyn DnsClient>,
        config: ReconcileConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            client,
            request: config.request,
            ttl: config.engine.ttl,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Fully-qualified record name this engine reconciles
    pub fn record_name(&self) -> String {
        fqdn(&self.request.tenant, &self.request.cluster)
    }

    /// Fully-qualified zone name this engine looks up
    pub fn zone_name(&self) -> String {
        zone_fqdn(&self.request.cluster)
    }

    /// Run one reconciliation
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: the zone now holds exactly one record for the name
    /// - `Err(Error)`: the first failure; the zone is left as the last
    ///   successful commit made it
    pub async fn run(&self) -> Result<ReconcileOutcome> {
        let record_name = self.record_name();

        match self.reconcile(&record_name).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!("Reconciliation of {} failed: {}", record_name, e);
                if let Error::ReplaceIncomplete { deleted, .. } = &e {
                    self.emit_event(EngineEvent::RecordDeleted {
                        record_name: record_name.clone(),
                        values: deleted.record.values.clone(),
                    });
                    warn!("{} was deleted and NOT recreated; re-run to restore it", record_name);
                }
                self.emit_event(EngineEvent::Failed {
                    record_name,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn reconcile(&self, record_name: &str) -> Result<ReconcileOutcome> {
        let zone_name = self.zone_name();
        let values = vec![self.request.value.trim().to_string()];

        self.emit_event(EngineEvent::Started {
            record_name: record_name.to_string(),
            zone_name: zone_name.clone(),
        });
        info!(
            "Reconciling {} {} -> {} via {}",
            self.request.record_type,
            record_name,
            self.request.value,
            self.client.provider_name()
        );

        let listing = self.client.list_hosted_zones().await?;
        let zone_id = find_zone(&listing, &zone_name)?;
        info!("Found hosted zone id {} for {}", zone_id, zone_name);
        self.emit_event(EngineEvent::ZoneResolved {
            zone_name,
            zone_id: zone_id.clone(),
        });

        let reconciler = RecordReconciler::new(self.client.as_ref()).with_ttl(self.ttl);

        let set = reconciler.fetch_record_set(&zone_id, record_name).await?;
        self.emit_event(EngineEvent::RecordSetFetched {
            record_name: record_name.to_string(),
            records: set.len(),
        });

        match RecordReconciler::select_record(&set, record_name, self.request.record_type) {
            None => {
                debug!("No existing record for {}", record_name);
                let commit = reconciler
                    .create_record(&set, self.request.record_type, record_name, &values)
                    .await?;
                info!("No existing record found. Created {}", record_name);
                self.emit_event(EngineEvent::RecordCreated {
                    record_name: record_name.to_string(),
                    values,
                });
                Ok(ReconcileOutcome::Created {
                    record_name: record_name.to_string(),
                    commit,
                })
            }
            Some(existing) => {
                debug!(
                    "Existing record for {}: {} {:?}",
                    record_name, existing.record_type, existing.values
                );
                let outcome = reconciler
                    .replace_record(&set, Some(existing), self.request.record_type, &values)
                    .await?;
                info!("Modified existing DNS entry for {}", record_name);
                self.emit_event(EngineEvent::RecordDeleted {
                    record_name: record_name.to_string(),
                    values: outcome.deleted.record.values.clone(),
                });
                self.emit_event(EngineEvent::RecordReplaced {
                    record_name: record_name.to_string(),
                    previous: existing.values.clone(),
                    values,
                });
                Ok(ReconcileOutcome::Replaced {
                    record_name: record_name.to_string(),
                    previous: existing.clone(),
                    commit: outcome.created,
                })
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
        }
    }
}

impl std::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineEvent::Started { record_name, zone_name } => {
                write!(f, "Setting DNS entry {} in zone {}", record_name, zone_name)
            }
            EngineEvent::ZoneResolved { zone_name, zone_id } => {
                write!(f, "Found host zone id {} for {}", zone_id, zone_name)
            }
            EngineEvent::RecordSetFetched { record_name, records } => {
                write!(f, "Fetched {} record(s) for {}", records, record_name)
            }
            EngineEvent::RecordCreated { record_name, values } => write!(
                f,
                "No existing record found. Added {} -> {}",
                record_name,
                values.join(",")
            ),
            EngineEvent::RecordDeleted { record_name, values } => {
                write!(f, "Deleted {} (was {})", record_name, values.join(","))
            }
            EngineEvent::RecordReplaced {
                record_name,
                previous,
                values,
            } => write!(
                f,
                "Modified existing DNS entry for {}: {} -> {}",
                record_name,
                previous.join(","),
                values.join(",")
            ),
            EngineEvent::Failed { record_name, error } => {
                write!(f, "Error occurred in setting DNS entry {}: {}", record_name, error)
            }
        }
    }
}
