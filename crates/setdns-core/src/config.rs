//! Configuration types for DNS record reconciliation
//!
//! This module defines the structures a reconciliation run is built from.

use crate::types::{DEFAULT_TTL, RecordType};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Zone used when no cluster is given
pub const DEFAULT_CLUSTER: &str = "nuk9.com";

/// Main reconciliation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// What to reconcile
    pub request: ReconcileRequest,

    /// DNS provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ReconcileConfig {
    pub fn new(request: ReconcileRequest) -> Self {
        Self {
            request,
            provider: ProviderConfig::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.request.validate()?;
        self.provider.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

/// The record a run should converge on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// Tenant name, without the cluster suffix (e.g. "dev1")
    pub tenant: String,

    /// Cluster / zone name (e.g. "nuk9.com")
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// Target value, typically an IP address
    pub value: String,

    #[serde(default = "default_record_type")]
    pub record_type: RecordType,
}

impl ReconcileRequest {
    /// Create a request for an A record in [`DEFAULT_CLUSTER`]
    pub fn new(tenant: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            cluster: default_cluster(),
            value: value.into(),
            record_type: default_record_type(),
        }
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    pub fn with_record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }

    /// Validate names and the target value
    ///
    /// A values must be IPv4 addresses and AAAA values IPv6 addresses; other
    /// types only need a non-empty value.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.tenant.trim().is_empty() {
            return Err(crate::Error::invalid_argument("Tenant name cannot be empty"));
        }
        if self.cluster.trim().is_empty() {
            return Err(crate::Error::invalid_argument("Cluster name cannot be empty"));
        }
        validate_domain_name(&self.tenant)?;
        validate_domain_name(self.cluster.trim_end_matches('.'))?;

        let value = self.value.trim();
        if value.is_empty() {
            return Err(crate::Error::invalid_argument("Target value cannot be empty"));
        }

        match self.record_type {
            RecordType::A => {
                value.parse::<Ipv4Addr>().map_err(|_| {
                    crate::Error::invalid_argument(format!(
                        "A record value must be an IPv4 address. Got: {}",
                        value
                    ))
                })?;
            }
            RecordType::Aaaa => {
                value.parse::<Ipv6Addr>().map_err(|_| {
                    crate::Error::invalid_argument(format!(
                        "AAAA record value must be an IPv6 address. Got: {}",
                        value
                    ))
                })?;
            }
            _ => {}
        }

        Ok(())
    }
}

/// Basic RFC 1035 name validation
///
/// Not comprehensive, but catches common errors before any network call.
pub fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::invalid_argument("Domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(crate::Error::invalid_argument(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::invalid_argument(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::invalid_argument(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(crate::Error::invalid_argument(format!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::invalid_argument(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// AWS Route 53
    Route53 {
        /// Signing region (defaults to us-east-1)
        #[serde(default)]
        region: Option<String>,
        /// API endpoint override
        #[serde(default)]
        endpoint: Option<String>,
        /// Log change batches instead of submitting them
        #[serde(default)]
        dry_run: bool,
        /// Comment attached to change batches
        #[serde(default)]
        comment: Option<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Route53 {
                region, endpoint, ..
            } => {
                if region.as_ref().is_some_and(|r| r.trim().is_empty()) {
                    return Err(crate::Error::config("Route 53 region cannot be empty"));
                }
                if let Some(endpoint) = endpoint
                    && !endpoint.starts_with("https://")
                    && !endpoint.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "Route 53 endpoint must use HTTP or HTTPS scheme. Got: {}",
                        endpoint
                    )));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Route53 { .. } => "route53",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Route53 {
            region: None,
            endpoint: None,
            dry_run: false,
            comment: None,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// TTL for created records, in seconds
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Capacity of the engine event channel
    ///
    /// When full, new events are dropped with a warning.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.ttl == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_cluster() -> String {
    DEFAULT_CLUSTER.to_string()
}

fn default_record_type() -> RecordType {
    RecordType::A
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_event_channel_capacity() -> usize {
    64
}
