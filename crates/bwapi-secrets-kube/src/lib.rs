// # Kubernetes Secret Store
//
// This crate provides a SecretStore backed by Kubernetes `Secret` objects.
//
// ## Behaviour
//
// - One `GET /api/v1/namespaces/:ns/secrets/:name` per lookup
// - Any API failure (missing object, RBAC denial, transport) maps to
//   `Error::SecretNotFound`; the resolver decides what a missing key means
// - No watch, no cache: every challenge call sees the current secret
//
// ## Security
//
// Secret values are never logged.

use async_trait::async_trait;
use bwapi_core::traits::{SecretData, SecretStore, SecretStoreFactory};
use bwapi_core::{Error, Result};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::sync::Arc;

pub use kube::Config as ClusterConfig;

/// Infer the ambient cluster configuration
///
/// Uses the in-cluster service account when running in a pod, and the local
/// kubeconfig otherwise.
pub async fn infer_cluster_config() -> Result<ClusterConfig> {
    ClusterConfig::infer()
        .await
        .map_err(|e| Error::client_init(format!("error loading cluster config: {}", e)))
}

/// SecretStore reading Kubernetes Secrets
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl std::fmt::Debug for KubeSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretStore").finish_non_exhaustive()
    }
}

impl KubeSecretStore {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from cluster configuration
    ///
    /// The client spawns its request buffer on the current Tokio runtime, so
    /// calling this outside one fails with `Error::ClientInit`.
    pub fn from_config(config: ClusterConfig) -> Result<Self> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(Error::client_init(
                "error creating kubernetes client: no Tokio runtime is running",
            ));
        }

        let client = Client::try_from(config)
            .map_err(|e| Error::client_init(format!("error creating kubernetes client: {}", e)))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData> {
        tracing::debug!(namespace = %namespace, secret = %name, "Fetching Kubernetes secret");

        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = api.get(name).await.map_err(|e| {
            tracing::warn!(
                namespace = %namespace,
                secret = %name,
                error = %e,
                "Secret lookup failed"
            );
            Error::secret_not_found(namespace, name, e.to_string())
        })?;

        Ok(secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect())
    }

    fn store_name(&self) -> &'static str {
        "kubernetes"
    }
}

/// Factory building a [`KubeSecretStore`] during solver initialization
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeSecretStoreFactory;

impl SecretStoreFactory for KubeSecretStoreFactory {
    type ClusterConfig = ClusterConfig;

    fn create(&self, cluster: ClusterConfig) -> Result<Arc<dyn SecretStore>> {
        Ok(Arc::new(KubeSecretStore::from_config(cluster)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_factory_builds_store_from_config() {
        let config = ClusterConfig::new("http://127.0.0.1:6443".parse().unwrap());

        let store = KubeSecretStoreFactory.create(config).unwrap();
        assert_eq!(store.store_name(), "kubernetes");
    }

    #[tokio::test]
    async fn test_debug_does_not_expose_client() {
        let config = ClusterConfig::new("http://127.0.0.1:6443".parse().unwrap());
        let store = KubeSecretStore::from_config(config).unwrap();

        assert!(format!("{:?}", store).contains("KubeSecretStore"));
    }

    #[test]
    fn test_from_config_outside_runtime_is_client_init_error() {
        let config = ClusterConfig::new("http://127.0.0.1:6443".parse().unwrap());

        let err = KubeSecretStore::from_config(config).unwrap_err();
        assert!(matches!(err, Error::ClientInit(_)));
        assert!(err.to_string().contains("no Tokio runtime"));
    }
}
