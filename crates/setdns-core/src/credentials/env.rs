// # Environment Credential Provider
//
// Reads `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` from the process
// environment. Unset variables become empty fields so that validation reports
// which key is missing.

use async_trait::async_trait;

use crate::Error;
use crate::traits::credential_provider::{
    ACCESS_KEY_NAME, CredentialProvider, Credentials, SECRET_KEY_NAME,
};

#[derive(Debug, Clone, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self
    }
}

fn credentials_from_lookup<F>(lookup: F) -> Credentials
where
    F: Fn(&str) -> Option<String>,
{
    Credentials {
        access_key_id: lookup(ACCESS_KEY_NAME).unwrap_or_default(),
        secret_access_key: lookup(SECRET_KEY_NAME).unwrap_or_default(),
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn credentials(&self) -> Result<Credentials, Error> {
        Ok(credentials_from_lookup(|key| std::env::var(key).ok()))
    }

    fn source_name(&self) -> String {
        "environment".to_string()
    }
}
