// # DNS Provider Trait
//
// Defines the interface for publishing challenge records via a provider API.
//
// ## Implementations
//
// - better-wapi: `bwapi-provider` crate
//
// ## Usage
//
// ```rust,ignore
// use bwapi_core::{DnsProvider, DnsRecord};
//
// let token = provider.authorize(&credentials).await?;
// provider
//     .create_record(&token, "example.com", &DnsRecord::challenge("_acme-challenge", "proof"))
//     .await?;
// ```

use async_trait::async_trait;

use crate::config::SolverConfig;
use crate::record::{AuthToken, Credentials, DnsRecord};

/// Trait for DNS provider implementations
///
/// A provider instance is built per challenge call from that call's
/// [`SolverConfig`] and dropped afterwards.
///
/// # Single-shot
///
/// Every method makes exactly one API request and returns its outcome.
/// Providers must not retry: record creation carries no idempotency key,
/// so a hidden retry can create the record twice. The hosting runtime
/// owns retry policy.
///
/// # Stateless
///
/// Tokens are returned to the caller and never cached by the provider.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Exchange credentials for a bearer token
    ///
    /// # Returns
    ///
    /// - `Ok(AuthToken)`: Token valid for the rest of the current call
    /// - `Err(Error::Authentication)`: Transport failure, non-success status, or bad body
    async fn authorize(&self, credentials: &Credentials) -> Result<AuthToken, crate::Error>;

    /// Create a record under `domain`
    ///
    /// No existence check is made first.
    async fn create_record(
        &self,
        token: &AuthToken,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<(), crate::Error>;

    /// Delete the record under `domain` matching `record`'s content
    ///
    /// The provider matches on subdomain, data and type.
    async fn delete_record(
        &self,
        token: &AuthToken,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance for one challenge call
    fn create(&self, config: &SolverConfig) -> Result<Box<dyn DnsProvider>, crate::Error>;

    /// Identifier the solver registers under with the hosting runtime
    fn provider_name(&self) -> &'static str;
}
