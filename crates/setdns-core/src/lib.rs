// # setdns-core
//
// Core library for reconciling a single DNS record inside a hosted zone.
//
// ## Architecture Overview
//
// - **find_zone**: Resolves `<cluster>.` to the provider's zone id
// - **RecordReconciler**: Fetches the record set and creates, deletes or replaces a record
// - **ReconcileEngine**: Drives one create-or-replace run and reports events
// - **DnsClient**: Trait for provider clients (list zones, list records, commit changes)
// - **CredentialProvider**: Trait for access key sources
// - **ClientRegistry**: Plugin-based registry for DNS clients
//
// ## Design Principles
//
// 1. **Explicit handles**: The reconciler receives a client, never global state
// 2. **Provider is truth**: Zones and records are fetched fresh; nothing persists locally
// 3. **Visible partial states**: A replace whose create fails is reported as such
// 4. **Library-First**: The binary is a thin layer over this crate

pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod reconciler;
pub mod registry;
pub mod traits;
pub mod types;
pub mod zone;

// Re-export core types for convenience
pub use config::{EngineConfig, ProviderConfig, ReconcileConfig, ReconcileRequest};
pub use credentials::{EnvCredentialProvider, FileCredentialProvider, StaticCredentialProvider};
pub use engine::{EngineEvent, ReconcileEngine, ReconcileOutcome};
pub use error::{Error, Result};
pub use reconciler::{RecordReconciler, ReplaceOutcome};
pub use registry::ClientRegistry;
pub use traits::{CredentialProvider, Credentials, DnsClient, DnsClientFactory};
pub use types::{
    Change, ChangeAction, ChangeStatus, CommitResult, HostedZone, Record, RecordType,
    ResourceRecordSet, ZoneListing,
};
pub use zone::find_zone;
