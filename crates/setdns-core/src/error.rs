//! Error types for DNS record reconciliation
//!
//! Every failure path in the crate surfaces as one of these variants; nothing
//! is retried or rolled back automatically.

use crate::types::Change;
use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing caller input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Zone or record absent when it was required
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport or authentication failure talking to the DNS provider
    #[error("Provider request failed ({provider}): {message}")]
    ProviderRequest {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// The provider answered with something we could not interpret
    #[error("Malformed provider response: {0}")]
    ProviderResponse(String),

    /// The provider rejected a change batch
    #[error("Commit rejected ({provider}): {message}")]
    Commit {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// A replace committed its DELETE but the CREATE failed.
    ///
    /// The record named here is now absent from the zone.
    #[error("Replace of {name} incomplete: record deleted but not recreated: {source}")]
    ReplaceIncomplete {
        /// Fully-qualified record name
        name: String,
        /// The DELETE change that was committed
        deleted: Box<Change>,
        /// Why the CREATE step failed
        #[source]
        source: Box<Error>,
    },

    /// Missing, empty or unreadable credentials
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider request error
    pub fn provider_request(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderRequest {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a provider response error
    pub fn provider_response(provider: &str, message: impl AsRef<str>) -> Self {
        Self::ProviderResponse(format!("{}: {}", provider, message.as_ref()))
    }

    /// Create a commit error
    pub fn commit(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Commit {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a credentials error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error left the zone without the record it started with
    pub fn is_partial_replace(&self) -> bool {
        matches!(self, Self::ReplaceIncomplete { .. })
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
