//! Plugin-based DNS client registry
//!
//! Provider crates register a factory under their type name; the binary
//! builds a client from configuration without naming the provider.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use setdns_core::ClientRegistry;
//!
//! let registry = ClientRegistry::new();
//! setdns_provider_route53::register(&registry);
//!
//! let client = registry.create_client(&config.provider, credentials)?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{Credentials, DnsClient, DnsClientFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registry of DNS client factories
///
/// ## Thread Safety
///
/// Interior mutability with RwLock allows concurrent reads and exclusive
/// writes.
#[derive(Default)]
pub struct ClientRegistry {
    factories: RwLock<HashMap<String, Box<dyn DnsClientFactory>>>,
}

impl ClientRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS client factory under `name` (e.g. "route53")
    pub fn register_client(&self, name: impl Into<String>, factory: Box<dyn DnsClientFactory>) {
        let mut factories = self.factories.write().unwrap_or_else(|e| e.into_inner());
        factories.insert(name.into(), factory);
    }

    /// Create a DNS client from configuration
    ///
    /// Credentials are validated first, so a missing or empty key fails here
    /// before any provider is contacted.
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsClient>)`: Created client
    /// - `Err(Error::Credentials)`: Incomplete credentials
    /// - `Err(Error::Config)`: Unknown provider type or factory failure
    pub fn create_client(
        &self,
        config: &ProviderConfig,
        credentials: Credentials,
    ) -> Result<Box<dyn DnsClient>> {
        credentials.validate()?;

        let provider_type = config.type_name();
        let factories = self.factories.read().unwrap_or_else(|e| e.into_inner());

        let factory = factories
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config, credentials)
    }

    /// List all registered provider types
    pub fn list_clients(&self) -> Vec<String> {
        let factories = self.factories.read().unwrap_or_else(|e| e.into_inner());
        factories.keys().cloned().collect()
    }

    /// Check if a provider type is registered
    pub fn has_client(&self, name: &str) -> bool {
        let factories = self.factories.read().unwrap_or_else(|e| e.into_inner());
        factories.contains_key(name)
    }
}
