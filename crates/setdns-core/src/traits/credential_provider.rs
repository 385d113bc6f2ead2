// # Credential Provider Trait
//
// Supplies the access key pair a DNS client authenticates with.
//
// ## Implementations
//
// - `FileCredentialProvider`: `KEY=VALUE` credentials file
// - `EnvCredentialProvider`: process environment
// - `StaticCredentialProvider`: fixed pair, for tests and embedding

use crate::error::Error;
use async_trait::async_trait;
use std::fmt;

/// Environment/file key holding the access key id
pub const ACCESS_KEY_NAME: &str = "AWS_ACCESS_KEY_ID";

/// Environment/file key holding the secret key
pub const SECRET_KEY_NAME: &str = "AWS_SECRET_ACCESS_KEY";

/// Access key pair
///
/// The Debug implementation never prints the secret key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    /// ⚠️ NEVER log this value
    pub secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Reject missing or empty keys
    pub fn validate(&self) -> Result<(), Error> {
        if self.access_key_id.trim().is_empty() {
            return Err(Error::credentials(format!("{} is missing or empty", ACCESS_KEY_NAME)));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(Error::credentials(format!("{} is missing or empty", SECRET_KEY_NAME)));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .finish()
    }
}

/// Trait for credential sources
///
/// Implementations only fetch; validation happens in the engine before any
/// provider call is made.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Load the access key pair
    ///
    /// # Returns
    ///
    /// - `Ok(Credentials)`: possibly incomplete; call [`Credentials::validate`]
    /// - `Err(Error::Credentials)`: the source could not be read
    async fn credentials(&self) -> Result<Credentials, Error>;

    /// Short description of the source, for logs
    fn source_name(&self) -> String;
}
