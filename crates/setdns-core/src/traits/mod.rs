//! Core traits for DNS record reconciliation
//!
//! - [`DnsClient`]: List zones and record sets, commit change batches
//! - [`CredentialProvider`]: Supply the access key pair a client signs with

pub mod credential_provider;
pub mod dns_client;

pub use credential_provider::{
    ACCESS_KEY_NAME, CredentialProvider, Credentials, SECRET_KEY_NAME,
};
pub use dns_client::{DnsClient, DnsClientFactory};
