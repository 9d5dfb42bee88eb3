// # Memory Secret Store
//
// In-memory implementation of SecretStore.
//
// Useful for tests and for embedding the solver where credentials are
// already at hand. Nothing is persisted.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::secret_store::{SecretData, SecretStore};

/// In-memory secret store implementation
///
/// Secrets are keyed by `(namespace, name)` and protected by a RwLock.
///
/// # Example
///
/// ```rust,no_run
/// use bwapi_core::secrets::MemorySecretStore;
/// use bwapi_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemorySecretStore::new();
///     store.insert("cert-manager", "wapi", "login", "user").await;
///
///     let data = store.get_secret("cert-manager", "wapi").await?;
///     assert_eq!(data["login"], b"user".to_vec());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    inner: Arc<RwLock<HashMap<(String, String), SecretData>>>,
    lookups: Arc<AtomicUsize>,
}

impl MemorySecretStore {
    /// Create a new empty memory secret store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one key of a secret, creating the secret if needed
    pub async fn insert(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
        value: impl Into<Vec<u8>>,
    ) {
        let mut guard = self.inner.write().await;
        guard
            .entry((namespace.to_string(), name.to_string()))
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Remove a whole secret
    pub async fn remove(&self, namespace: &str, name: &str) -> Option<SecretData> {
        let mut guard = self.inner.write().await;
        guard.remove(&(namespace.to_string(), name.to_string()))
    }

    /// Get the number of secrets in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Number of `get_secret` calls served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, Error> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let guard = self.inner.read().await;
        guard
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::secret_not_found(namespace, name, "secret does not exist"))
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemorySecretStore::new();
        assert!(store.is_empty().await);

        store.insert("ns", "wapi", "login", "user").await;
        store.insert("ns", "wapi", "secret", "pass").await;

        assert_eq!(store.len().await, 1);
        let data = store.get_secret("ns", "wapi").await.unwrap();
        assert_eq!(data.get("login"), Some(&b"user".to_vec()));
        assert_eq!(data.get("secret"), Some(&b"pass".to_vec()));
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = MemorySecretStore::new();
        store.insert("team-a", "wapi", "login", "a").await;

        let err = store.get_secret("team-b", "wapi").await.unwrap_err();
        assert!(matches!(err, Error::SecretNotFound { .. }));
        assert_eq!(store.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemorySecretStore::new();
        store.insert("ns", "wapi", "login", "user").await;

        assert!(store.remove("ns", "wapi").await.is_some());
        assert!(store.get_secret("ns", "wapi").await.is_err());
    }
}
