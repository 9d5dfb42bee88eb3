// # bwapi-core
//
// Core library for the better-wapi ACME DNS-01 challenge solver.
//
// ## Architecture Overview
//
// Given a challenge hostname and proof value, the solver authenticates
// against the DNS provider API, publishes a TXT record, and later removes it.
//
// - **fqdn**: Splits the challenge FQDN into registrable domain and subdomain
// - **SecretStore**: Trait for namespaced credential lookup
// - **secrets**: Credential resolution and an in-memory store
// - **DnsProvider**: Trait for token exchange and record create/delete
// - **ChallengeSolver**: Orchestrates Present and CleanUp
//
// ## Design Principles
//
// 1. **Stateless calls**: Present and CleanUp each re-derive everything from the request
// 2. **Single-shot**: No retries anywhere; the hosting runtime owns retry policy
// 3. **Library-first**: Network and cluster backends live in their own crates
// 4. **Early rejection**: Malformed FQDNs fail before any network request

pub mod challenge;
pub mod config;
pub mod error;
pub mod fqdn;
pub mod record;
pub mod secrets;
pub mod solver;
pub mod traits;

// Re-export core types for convenience
pub use challenge::{ChallengeAction, ChallengeRequest};
pub use config::{SecretRef, SolverConfig, StartupConfig};
pub use error::{Error, Result, Stage};
pub use record::{AuthToken, Credentials, DnsRecord, RecordType};
pub use secrets::MemorySecretStore;
pub use solver::ChallengeSolver;
pub use traits::{DnsProvider, DnsProviderFactory, SecretStore, SecretStoreFactory, Solver};
