//! Resolving secret references into plaintext credentials
//!
//! One store lookup per reference, no retries and no caching between calls.

use tracing::debug;

use crate::config::{SecretRef, SolverConfig};
use crate::error::{Error, Result, Stage};
use crate::record::Credentials;
use crate::traits::SecretStore;

/// Resolve one secret reference inside `namespace`
///
/// # Errors
///
/// - `Error::SecretNotFound`: the secret object is missing or the lookup failed
/// - `Error::SecretKeyNotFound`: the secret has no `reference.key`
/// - `Error::SecretNotUtf8`: the value is not valid UTF-8
pub async fn resolve_secret(
    store: &dyn SecretStore,
    reference: &SecretRef,
    namespace: &str,
) -> Result<String> {
    debug!(
        store = store.store_name(),
        namespace = %namespace,
        secret = %reference.name,
        key = %reference.key,
        "Resolving secret"
    );

    let mut data = store.get_secret(namespace, &reference.name).await?;

    let value = data
        .remove(&reference.key)
        .ok_or_else(|| Error::SecretKeyNotFound {
            namespace: namespace.to_string(),
            name: reference.name.clone(),
            key: reference.key.clone(),
        })?;

    String::from_utf8(value).map_err(|_| Error::SecretNotUtf8 {
        namespace: namespace.to_string(),
        name: reference.name.clone(),
        key: reference.key.clone(),
    })
}

/// Resolve the login and secret named by `config`
///
/// The login is resolved first; a failure there skips the second lookup.
pub async fn resolve_credentials(
    store: &dyn SecretStore,
    config: &SolverConfig,
    namespace: &str,
) -> Result<Credentials> {
    let login = resolve_secret(store, &config.user_login_secret_ref, namespace)
        .await
        .map_err(|e| e.in_stage(Stage::LoginSecret))?;

    let secret = resolve_secret(store, &config.user_secret_secret_ref, namespace)
        .await
        .map_err(|e| e.in_stage(Stage::SecretSecret))?;

    Ok(Credentials::new(login, secret))
}
