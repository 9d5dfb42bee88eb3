// # Secret Resolution
//
// Credential lookup against a [`crate::SecretStore`], plus an in-memory
// store implementation.

pub mod memory;
pub mod resolver;

pub use memory::MemorySecretStore;
pub use resolver::{resolve_credentials, resolve_secret};
