//! Challenge orchestrator
//!
//! [`ChallengeSolver`] composes the collaborators into the two operations
//! the hosting runtime drives:
//!
//! ```text
//! ChallengeRequest
//!       │
//!       ▼
//! decode SolverConfig ─► resolve login ─► resolve secret ─► decompose FQDN
//!                                                                │
//!       ┌────────────────────────────────────────────────────────┘
//!       ▼
//! DnsProviderFactory::create ─► authorize ─► create_record | delete_record
//! ```
//!
//! Every call re-runs the whole sequence. Nothing carries over from Present
//! to the later CleanUp except what both derive from the same request, so
//! CleanUp targets the record Present created by recomputing it.
//!
//! Any failure stops the call and is returned wrapped with its [`Stage`].

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::challenge::ChallengeRequest;
use crate::config::{SolverConfig, StartupConfig};
use crate::error::{Error, Result, Stage};
use crate::fqdn::{self, ChallengeName};
use crate::record::{Credentials, DnsRecord};
use crate::secrets::resolve_credentials;
use crate::traits::{DnsProvider, DnsProviderFactory, SecretStore, SecretStoreFactory, Solver};

/// Everything a call needs before its first network request
struct PreparedCall {
    provider: Box<dyn DnsProvider>,
    credentials: Credentials,
    name: ChallengeName,
    record: DnsRecord,
}

/// DNS-01 challenge solver
///
/// ## Lifecycle
///
/// 1. Create with [`ChallengeSolver::new()`]
/// 2. Call [`Solver::initialize()`] to build the secret store client
/// 3. Serve [`Solver::present()`] and [`Solver::clean_up()`] calls
///
/// ## Threading
///
/// Calls hold no shared mutable state and may run concurrently. Each call
/// builds its own provider client and obtains its own token.
pub struct ChallengeSolver<S: SecretStoreFactory> {
    /// Validated process configuration
    startup: StartupConfig,

    /// Builds a provider client per call
    providers: Box<dyn DnsProviderFactory>,

    /// Builds the secret store during initialize
    secret_factory: S,

    /// Set by initialize
    secrets: Option<Arc<dyn SecretStore>>,
}

impl<S: SecretStoreFactory> ChallengeSolver<S> {
    /// Create a new, uninitialized solver
    pub fn new(
        startup: StartupConfig,
        providers: Box<dyn DnsProviderFactory>,
        secret_factory: S,
    ) -> Self {
        Self {
            startup,
            providers,
            secret_factory,
            secrets: None,
        }
    }

    /// API group the solver registers under
    pub fn group_name(&self) -> &str {
        &self.startup.group_name
    }

    /// Whether initialize has completed
    pub fn is_initialized(&self) -> bool {
        self.secrets.is_some()
    }

    /// Run every step that precedes authentication
    async fn prepare(&self, request: &ChallengeRequest) -> Result<PreparedCall> {
        let secrets = self
            .secrets
            .as_deref()
            .ok_or_else(|| Error::client_init("solver used before initialize"))?;

        let config = SolverConfig::decode(request.config.as_ref())
            .map_err(|e| e.in_stage(Stage::LoadConfig))?;

        let credentials =
            resolve_credentials(secrets, &config, &request.resource_namespace).await?;

        let name =
            fqdn::decompose(&request.resolved_fqdn).map_err(|e| e.in_stage(Stage::Decompose))?;

        let provider = self
            .providers
            .create(&config)
            .map_err(|e| e.in_stage(Stage::ProviderClient))?;

        let record = DnsRecord::challenge(name.subdomain.clone(), request.key.clone());

        debug!(
            provider = provider.provider_name(),
            domain = %name.domain,
            subdomain = %name.subdomain,
            "Prepared challenge call"
        );

        Ok(PreparedCall {
            provider,
            credentials,
            name,
            record,
        })
    }
}

#[async_trait]
impl<S: SecretStoreFactory> Solver for ChallengeSolver<S> {
    type ClusterConfig = S::ClusterConfig;

    fn name(&self) -> &'static str {
        self.providers.provider_name()
    }

    fn initialize(
        &mut self,
        cluster: Self::ClusterConfig,
        _stop: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        // No background work is started, so there is nothing for the stop signal to end.
        let store = self.secret_factory.create(cluster)?;

        info!(
            solver = self.name(),
            group = %self.startup.group_name,
            store = store.store_name(),
            "Solver initialized"
        );

        self.secrets = Some(store);
        Ok(())
    }

    async fn present(&self, request: &ChallengeRequest) -> Result<()> {
        info!(
            fqdn = %request.resolved_fqdn,
            namespace = %request.resource_namespace,
            "Presenting DNS-01 challenge"
        );

        let call = self.prepare(request).await?;

        let token = call
            .provider
            .authorize(&call.credentials)
            .await
            .map_err(|e| e.in_stage(Stage::Authorize))?;

        if let Err(e) = call
            .provider
            .create_record(&token, &call.name.domain, &call.record)
            .await
        {
            warn!(fqdn = %request.resolved_fqdn, error = %e, "Challenge record creation failed");
            return Err(e.in_stage(Stage::CreateRecord));
        }

        info!(
            domain = %call.name.domain,
            subdomain = %call.name.subdomain,
            "Challenge record created"
        );
        Ok(())
    }

    async fn clean_up(&self, request: &ChallengeRequest) -> Result<()> {
        info!(
            fqdn = %request.resolved_fqdn,
            namespace = %request.resource_namespace,
            "Cleaning up DNS-01 challenge"
        );

        let call = self.prepare(request).await?;

        let token = call
            .provider
            .authorize(&call.credentials)
            .await
            .map_err(|e| e.in_stage(Stage::Authorize))?;

        if let Err(e) = call
            .provider
            .delete_record(&token, &call.name.domain, &call.record)
            .await
        {
            warn!(fqdn = %request.resolved_fqdn, error = %e, "Challenge record deletion failed");
            return Err(e.in_stage(Stage::DeleteRecord));
        }

        info!(
            domain = %call.name.domain,
            subdomain = %call.name.subdomain,
            "Challenge record deleted"
        );
        Ok(())
    }
}
