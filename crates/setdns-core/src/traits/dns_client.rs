// # DNS Client Trait
//
// Defines the three provider operations the reconciler consumes.
//
// ## Implementations
//
// - AWS Route 53: `setdns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use setdns_core::DnsClient;
//
// async fn show(client: &dyn DnsClient) -> setdns_core::Result<()> {
//     let listing = client.list_hosted_zones().await?;
//     let set = client.list_record_sets("Z123", "dev1.nuk9.com.").await?;
//     println!("{} record(s) in {}", set.len(), set.zone_id);
//     Ok(())
// }
// ```

use crate::config::ProviderConfig;
use crate::error::Error;
use crate::traits::Credentials;
use crate::types::{Change, CommitResult, ResourceRecordSet, ZoneListing};
use async_trait::async_trait;

/// Trait for DNS provider clients
///
/// A client owns its transport and authentication. The reconciler never sees
/// credentials or connections, only this handle.
///
/// # Trust Level: Untrusted
///
/// Clients are isolated integrations with these limitations:
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses into the shared data model
/// - ✅ Follow provider pagination within a single listing call
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (failures are surfaced, the caller re-runs)
/// - ❌ Decide between create and replace (owned by `RecordReconciler`)
/// - ❌ Cache zones or records across calls
/// - ❌ Spawn tasks or threads
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// List every hosted zone visible to the credentials
    ///
    /// # Returns
    ///
    /// - `Ok(ZoneListing)`: `hosted_zones` is `None` if the response was
    ///   missing its zone wrapper
    /// - `Err(Error::ProviderRequest)`: transport or authentication failure
    /// - `Err(Error::ProviderResponse)`: undecodable response
    async fn list_hosted_zones(&self) -> Result<ZoneListing, Error>;

    /// Fetch the record set for `name` within a zone
    ///
    /// # Parameters
    ///
    /// - `zone_id`: Zone identifier in suffix form (e.g. `Z123`)
    /// - `name`: Fully-qualified record name with trailing dot
    ///
    /// The returned set carries `name` as its logical name. Providers may
    /// include records other than `name`; callers scan for an exact match.
    async fn list_record_sets(
        &self,
        zone_id: &str,
        name: &str,
    ) -> Result<ResourceRecordSet, Error>;

    /// Submit a batch of changes as a single provider transaction
    ///
    /// Either every change in `changes` is applied or none is.
    ///
    /// # Returns
    ///
    /// - `Ok(CommitResult)`: the provider accepted the batch
    /// - `Err(Error::Commit)`: the provider rejected it
    /// - `Err(Error::ProviderRequest)`: the request never completed
    async fn commit_changes(
        &self,
        set: &ResourceRecordSet,
        changes: &[Change],
    ) -> Result<CommitResult, Error>;

    /// Provider name (for logging and error context)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS clients from configuration
pub trait DnsClientFactory: Send + Sync {
    /// Create a client for `config`, authenticated with `credentials`
    fn create(
        &self,
        config: &ProviderConfig,
        credentials: Credentials,
    ) -> Result<Box<dyn DnsClient>, Error>;
}
