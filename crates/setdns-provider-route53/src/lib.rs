// # Route 53 DNS Client
//
// This crate provides the AWS Route 53 implementation of `DnsClient`.
//
// - ✅ One HTTP request per trait call (plus pagination for zone listings)
// - ✅ Full error propagation (the caller decides whether to re-run)
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Signature Version 4 request signing
// - ✅ Dry-run mode (reads are live, change batches are only logged)
// - ❌ NO retry or backoff
// - ❌ NO caching of zones or records between calls
// - ❌ NO background tasks
//
// ## Security Requirements
//
// - The secret key NEVER appears in logs or Debug output
// - Credentials are validated before the client is built
//
// ## API Reference
//
// - List hosted zones: GET `/2013-04-01/hostedzone`
// - List record sets: GET `/2013-04-01/hostedzone/{id}/rrset?name=...`
// - Change record sets: POST `/2013-04-01/hostedzone/{id}/rrset/`

pub mod signing;
pub mod xml;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, StatusCode, Url};
use setdns_core::config::ProviderConfig;
use setdns_core::traits::{Credentials, DnsClient, DnsClientFactory};
use setdns_core::types::{
    Change, ChangeStatus, CommitResult, HostedZone, ResourceRecordSet, ZoneListing,
};
use setdns_core::{ClientRegistry, Error, Result};
use signing::{SignableRequest, canonical_query, sign, uri_encode};
use std::time::Duration;
use xml::{
    ChangeResourceRecordSetsRequest, ChangeResourceRecordSetsResponse, ListHostedZonesResponse,
    ListResourceRecordSetsResponse, WireRecordSet, describe_error,
};

/// Route 53 API endpoint
pub const ROUTE53_ENDPOINT: &str = "https://route53.amazonaws.com";

/// Region Route 53 requests are signed for
pub const DEFAULT_REGION: &str = "us-east-1";

const SERVICE: &str = "route53";
const API_VERSION: &str = "2013-04-01";
const PROVIDER: &str = "route53";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Route 53 DNS client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform all GET requests (zone and record listings)
/// - Log the change batch it would have POSTed
/// - **NOT** submit any change
pub struct Route53Client {
    /// ⚠️ NEVER log the secret key
    credentials: Credentials,

    /// Base URL without trailing slash
    endpoint: String,

    /// `host[:port]` as sent in the Host header
    host: String,

    region: String,

    /// Comment attached to change batches
    comment: Option<String>,

    client: reqwest::Client,

    dry_run: bool,
}

// Custom Debug implementation that hides the secret key
impl std::fmt::Debug for Route53Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Client")
            .field("access_key_id", &self.credentials.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Route53Client {
    /// Create a new Route 53 client
    ///
    /// # Parameters
    ///
    /// - `credentials`: Access key pair; must pass [`Credentials::validate`]
    /// - `endpoint`: API base URL (defaults to [`ROUTE53_ENDPOINT`])
    /// - `region`: Signing region (defaults to [`DEFAULT_REGION`])
    /// - `dry_run`: If true, log change batches instead of submitting them
    pub fn new(
        credentials: Credentials,
        endpoint: Option<&str>,
        region: Option<&str>,
        dry_run: bool,
    ) -> Result<Self> {
        credentials.validate()?;

        let endpoint = endpoint
            .unwrap_or(ROUTE53_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        let url = Url::parse(&endpoint)
            .map_err(|e| Error::config(format!("Invalid Route 53 endpoint {}: {}", endpoint, e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(Error::config(format!(
                    "Route 53 endpoint has no host: {}",
                    endpoint
                )));
            }
        };

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            endpoint,
            host,
            region: region.unwrap_or(DEFAULT_REGION).to_string(),
            comment: None,
            client,
            dry_run,
        })
    }

    /// Client for the public endpoint that submits changes
    pub fn new_live(credentials: Credentials) -> Result<Self> {
        Self::new(credentials, None, None, false)
    }

    /// Client for the public endpoint that only logs change batches
    pub fn new_dry_run(credentials: Credentials) -> Result<Self> {
        Self::new(credentials, None, None, true)
    }

    /// Attach `comment` to every change batch
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Send a signed request and return the status and body
    ///
    /// Only transport failures are errors here; callers map the status.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<(StatusCode, String)> {
        let payload = body.unwrap_or_default();
        let headers = [("host", self.host.as_str())];
        let signature = sign(
            &SignableRequest {
                method: method.as_str(),
                path,
                query,
                headers: &headers,
                payload: payload.as_bytes(),
            },
            &self.credentials,
            &self.region,
            SERVICE,
            Utc::now(),
        )?;

        let query_string = canonical_query(query);
        let url = if query_string.is_empty() {
            format!("{}{}", self.endpoint, path)
        } else {
            format!("{}{}?{}", self.endpoint, path, query_string)
        };

        tracing::debug!("Route 53 API request: {} {}", method, url);

        let mut request = self
            .client
            .request(method, url.as_str())
            .header("X-Amz-Date", signature.amz_date)
            .header("Authorization", signature.authorization);
        if !payload.is_empty() {
            request = request
                .header("Content-Type", "application/xml")
                .body(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::provider_request(PROVIDER, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            Error::provider_request(PROVIDER, format!("Failed to read response: {}", e))
        })?;

        Ok((status, text))
    }

    /// Fetch one page of hosted zones starting at `marker`
    async fn fetch_zone_page(&self, marker: Option<&str>) -> Result<ListHostedZonesResponse> {
        let path = format!("/{}/hostedzone", API_VERSION);
        let query: Vec<(&str, &str)> = marker.map(|m| vec![("marker", m)]).unwrap_or_default();

        let (status, body) = self.send(Method::GET, &path, &query, None).await?;
        if !status.is_success() {
            return Err(listing_error("Hosted zone listing", status, &body));
        }

        quick_xml::de::from_str(&body).map_err(|e| {
            Error::provider_response(PROVIDER, format!("Failed to parse hosted zones: {}", e))
        })
    }
}

/// Map a non-2xx listing response to an error
fn listing_error(operation: &str, status: StatusCode, body: &str) -> Error {
    let detail = describe_error(body);
    match status.as_u16() {
        401 | 403 => Error::provider_request(
            PROVIDER,
            format!(
                "Authentication failed: Invalid access key or insufficient permissions. Status: {} - {}",
                status, detail
            ),
        ),
        429 => Error::provider_request(
            PROVIDER,
            format!("Rate limit exceeded. Status: {} - {}", status, detail),
        ),
        500..=599 => Error::provider_request(
            PROVIDER,
            format!("Route 53 server error (transient): {} - {}", status, detail),
        ),
        _ => Error::provider_request(
            PROVIDER,
            format!("{} failed: {} - {}", operation, status, detail),
        ),
    }
}

#[async_trait]
impl DnsClient for Route53Client {
    /// List every hosted zone, following `NextMarker` pagination
    async fn list_hosted_zones(&self) -> Result<ZoneListing> {
        let mut zones: Vec<HostedZone> = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.fetch_zone_page(marker.as_deref()).await?;

            let Some(wrapper) = page.hosted_zones else {
                tracing::warn!("Hosted zone listing is missing its HostedZones element");
                return Ok(ZoneListing::malformed());
            };
            zones.extend(wrapper.hosted_zone.into_iter().map(HostedZone::from));

            match (page.is_truncated, page.next_marker) {
                (true, Some(next)) => marker = Some(next),
                _ => break,
            }
        }

        tracing::debug!("Listed {} hosted zone(s)", zones.len());
        Ok(ZoneListing::new(zones))
    }

    /// Fetch one page of record sets starting at `name`
    ///
    /// Route 53 lists in name order from `name`, so later names may appear
    /// in the set as well.
    async fn list_record_sets(&self, zone_id: &str, name: &str) -> Result<ResourceRecordSet> {
        let path = format!(
            "/{}/hostedzone/{}/rrset",
            API_VERSION,
            uri_encode(zone_id, true)
        );

        let (status, body) = self
            .send(Method::GET, &path, &[("name", name)], None)
            .await?;
        if !status.is_success() {
            return Err(listing_error("Record set listing", status, &body));
        }

        let parsed: ListResourceRecordSetsResponse = quick_xml::de::from_str(&body).map_err(|e| {
            Error::provider_response(PROVIDER, format!("Failed to parse record sets: {}", e))
        })?;
        let wrapper = parsed.resource_record_sets.ok_or_else(|| {
            Error::provider_response(PROVIDER, "Record set listing is missing ResourceRecordSets")
        })?;

        let records = wrapper
            .resource_record_set
            .into_iter()
            .filter_map(WireRecordSet::into_record)
            .collect();

        Ok(ResourceRecordSet::new(zone_id, name, records))
    }

    /// Submit `changes` as one ChangeResourceRecordSets batch
    async fn commit_changes(
        &self,
        set: &ResourceRecordSet,
        changes: &[Change],
    ) -> Result<CommitResult> {
        if changes.is_empty() {
            return Err(Error::invalid_argument("Change batch cannot be empty"));
        }

        let body = ChangeResourceRecordSetsRequest::new(self.comment.clone(), changes)
            .to_xml()
            .map_err(|e| Error::commit(PROVIDER, format!("Failed to serialize change batch: {}", e)))?;
        let path = format!(
            "/{}/hostedzone/{}/rrset/",
            API_VERSION,
            uri_encode(&set.zone_id, true)
        );

        // In dry-run mode, log the intended batch and return success
        if self.dry_run {
            tracing::info!("[DRY-RUN] Would send POST request to {} with payload: {}", path, body);
            return Ok(CommitResult {
                change_id: "dry-run".to_string(),
                status: ChangeStatus::Pending,
                submitted_at: None,
            });
        }

        let (status, response) = self.send(Method::POST, &path, &[], Some(body)).await?;
        if !status.is_success() {
            return Err(Error::commit(
                PROVIDER,
                format!("{} (status {})", describe_error(&response), status),
            ));
        }

        let parsed: ChangeResourceRecordSetsResponse =
            quick_xml::de::from_str(&response).map_err(|e| {
                Error::provider_response(PROVIDER, format!("Failed to parse ChangeInfo: {}", e))
            })?;
        let result = CommitResult::from(parsed.change_info);

        tracing::debug!("Route 53 accepted change {} ({:?})", result.change_id, result.status);
        Ok(result)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Factory for creating Route 53 clients
pub struct Route53Factory;

impl DnsClientFactory for Route53Factory {
    fn create(
        &self,
        config: &ProviderConfig,
        credentials: Credentials,
    ) -> Result<Box<dyn DnsClient>> {
        match config {
            ProviderConfig::Route53 {
                region,
                endpoint,
                dry_run,
                comment,
            } => {
                if *dry_run {
                    tracing::warn!("Route 53 client running in DRY-RUN mode - no changes will be made");
                }

                let client =
                    Route53Client::new(credentials, endpoint.as_deref(), region.as_deref(), *dry_run)?
                        .with_comment(comment.clone());
                Ok(Box::new(client))
            }
            _ => Err(Error::config("Invalid config for Route 53 provider")),
        }
    }
}

/// Register the Route 53 client with a registry
///
/// # Example
///
/// ```rust
/// use setdns_core::ClientRegistry;
///
/// let registry = ClientRegistry::new();
/// setdns_provider_route53::register(&registry);
/// assert!(registry.has_client("route53"));
/// ```
pub fn register(registry: &ClientRegistry) {
    registry.register_client(PROVIDER, Box::new(Route53Factory));
}
