//! Test doubles and common utilities for solver contract tests
//!
//! The doubles record every call so tests can assert on what reached the
//! provider, and in which order.

#![allow(dead_code)]

use bwapi_core::error::{Error, Result};
use bwapi_core::traits::{DnsProvider, DnsProviderFactory, SecretStore, SecretStoreFactory};
use bwapi_core::{
    AuthToken, ChallengeRequest, ChallengeSolver, Credentials, DnsRecord, MemorySecretStore,
    Solver, SolverConfig, StartupConfig,
};
use std::sync::{Arc, Mutex};

pub const NAMESPACE: &str = "cert-manager";
pub const BASE_URL: &str = "https://api.example.net/";

/// A provider call as observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Authorize { login: String, secret: String },
    Create { token: String, domain: String, record: DnsRecord },
    Delete { token: String, domain: String, record: DnsRecord },
}

/// Failure switches for the mock provider
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub authorize: bool,
    pub create: bool,
    pub delete: bool,
}

/// A mock DnsProvider that records calls into a shared log
pub struct MockDnsProvider {
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    failures: Failures,
    token: String,
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn authorize(&self, credentials: &Credentials) -> Result<AuthToken> {
        self.calls.lock().unwrap().push(ProviderCall::Authorize {
            login: credentials.login.clone(),
            secret: credentials.secret.clone(),
        });

        if self.failures.authorize {
            return Err(Error::auth("auth request failed with status: 401"));
        }
        Ok(AuthToken::new(self.token.clone()))
    }

    async fn create_record(
        &self,
        token: &AuthToken,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(ProviderCall::Create {
            token: token.as_str().to_string(),
            domain: domain.to_string(),
            record: record.clone(),
        });

        if self.failures.create {
            return Err(Error::record_create(Some(500), "conflict"));
        }
        Ok(())
    }

    async fn delete_record(
        &self,
        token: &AuthToken,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(ProviderCall::Delete {
            token: token.as_str().to_string(),
            domain: domain.to_string(),
            record: record.clone(),
        });

        if self.failures.delete {
            return Err(Error::record_delete(Some(404), "record not found"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Factory handing out mock providers that share one call log
#[derive(Clone, Default)]
pub struct MockProviderFactory {
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    configs: Arc<Mutex<Vec<SolverConfig>>>,
    failures: Failures,
}

impl MockProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failures: Failures) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }

    /// All provider calls across every provider instance, in order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Configurations providers were built from
    pub fn configs(&self) -> Vec<SolverConfig> {
        self.configs.lock().unwrap().clone()
    }

    pub fn authorize_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ProviderCall::Authorize { .. }))
            .count()
    }
}

impl DnsProviderFactory for MockProviderFactory {
    fn create(&self, config: &SolverConfig) -> Result<Box<dyn DnsProvider>> {
        self.configs.lock().unwrap().push(config.clone());
        let n = self.configs.lock().unwrap().len();

        Ok(Box::new(MockDnsProvider {
            calls: Arc::clone(&self.calls),
            failures: self.failures,
            token: format!("token-{}", n),
        }))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Secret store factory returning a pre-filled memory store
pub struct MemoryStoreFactory(pub MemorySecretStore);

impl SecretStoreFactory for MemoryStoreFactory {
    type ClusterConfig = ();

    fn create(&self, _cluster: ()) -> Result<Arc<dyn SecretStore>> {
        Ok(Arc::new(self.0.clone()))
    }
}

/// Store holding the standard credential secret
pub async fn credential_store() -> MemorySecretStore {
    let store = MemorySecretStore::new();
    store.insert(NAMESPACE, "wapi-credentials", "login", "user").await;
    store.insert(NAMESPACE, "wapi-credentials", "secret", "pass").await;
    store
}

/// Standard per-challenge configuration blob
pub fn config_json() -> serde_json::Value {
    serde_json::json!({
        "baseUrl": BASE_URL,
        "userLoginSecretRef": { "name": "wapi-credentials", "key": "login" },
        "userSecretSecretRef": { "name": "wapi-credentials", "key": "secret" }
    })
}

/// Challenge request for `fqdn` with the standard configuration
pub fn request(fqdn: &str, key: &str) -> ChallengeRequest {
    ChallengeRequest::new(fqdn, key, NAMESPACE, Some(config_json()))
}

/// Build and initialize a solver around the given doubles
pub fn initialized_solver(
    providers: &MockProviderFactory,
    store: MemorySecretStore,
) -> ChallengeSolver<MemoryStoreFactory> {
    let mut solver = ChallengeSolver::new(
        StartupConfig::new("acme.example.net"),
        Box::new(providers.clone()),
        MemoryStoreFactory(store),
    );
    solver.initialize((), None).expect("initialize succeeds");
    solver
}
