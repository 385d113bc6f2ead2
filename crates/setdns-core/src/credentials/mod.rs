// # Credential Provider Implementations
//
// Sources for the access key pair handed to DNS clients.

pub mod env;
pub mod file;
pub mod memory;

pub use env::EnvCredentialProvider;
pub use file::{FileCredentialProvider, parse_credentials};
pub use memory::StaticCredentialProvider;
