//! Core traits for the solver
//!
//! This module defines the seams between the orchestrator and its collaborators.
//!
//! - [`SecretStore`]: Namespaced key-value secret lookup
//! - [`DnsProvider`]: Token exchange and TXT record lifecycle at the provider
//! - [`Solver`]: The four operations the hosting runtime invokes

pub mod dns_provider;
pub mod secret_store;
pub mod solver;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
pub use secret_store::{SecretData, SecretStore, SecretStoreFactory};
pub use solver::Solver;
