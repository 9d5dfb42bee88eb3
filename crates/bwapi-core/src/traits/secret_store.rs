// # Secret Store Trait
//
// Defines the interface for reading credential secrets.
//
// ## Purpose
//
// The solver never holds credentials in its configuration. Each challenge
// names two secrets by reference, and the store resolves them inside the
// challenge's namespace.
//
// ## Implementations
//
// - Kubernetes Secrets: `bwapi-secrets-kube` crate
// - In-memory: [`crate::secrets::MemorySecretStore`] (tests, embedding)

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Key-value payload of one secret object
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Trait for secret store implementations
///
/// Lookups are single-shot. A store must not retry or cache between calls.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the payload of a secret object
    ///
    /// # Returns
    ///
    /// - `Ok(SecretData)`: The secret's key-value payload
    /// - `Err(Error::SecretNotFound)`: The object does not exist or the lookup failed
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}

/// Helper trait for constructing a secret store during `Initialize`
///
/// `ClusterConfig` is whatever ambient configuration the backend needs to
/// build its client.
pub trait SecretStoreFactory: Send + Sync {
    /// Ambient configuration handed over by the hosting runtime
    type ClusterConfig: Send;

    /// Create a SecretStore from the ambient configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn SecretStore>)`: The constructed store
    /// - `Err(Error::ClientInit)`: If the client could not be built
    fn create(&self, cluster: Self::ClusterConfig)
        -> Result<Arc<dyn SecretStore>, crate::Error>;
}
