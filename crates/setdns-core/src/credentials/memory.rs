// # Static Credential Provider
//
// Hands out a fixed key pair. Useful for tests and for embedding the engine
// in a program that already holds credentials.

use async_trait::async_trait;

use crate::Error;
use crate::traits::credential_provider::{CredentialProvider, Credentials};

#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credentials(&self) -> Result<Credentials, Error> {
        Ok(self.credentials.clone())
    }

    fn source_name(&self) -> String {
        "static".to_string()
    }
}
