// # better-wapi DNS Provider
//
// This crate provides the better-wapi provider client for the DNS-01
// challenge solver.
//
// - ✅ One HTTP request per operation
// - ✅ Full error propagation (status code and response body on failure)
// - ✅ 60 second timeout on record create/delete
// - ❌ NO retry logic (record creation has no idempotency key)
// - ❌ NO token caching (every solver call authenticates afresh)
// - ❌ NO existence checks before create
//
// ## Security Requirements
//
// - Credentials and bearer tokens NEVER appear in logs
//
// ## API Reference
//
// - Authenticate: POST `/api/auth/token` `{"login","secret"}` -> 200 `{"token"}`
// - Create record: POST `/api/v1/domain/:domain/record` -> 201
// - Delete record: DELETE `/api/v1/domain/:domain/record` (same body) -> 200

use async_trait::async_trait;
use bwapi_core::traits::{DnsProvider, DnsProviderFactory};
use bwapi_core::{AuthToken, Credentials, DnsRecord, Error, Result, SolverConfig};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier the solver registers under
pub const PROVIDER_NAME: &str = "better-wapi";

/// Timeout for record create/delete requests
pub const RECORD_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct AuthRequest<'a> {
    login: &'a str,
    secret: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

/// better-wapi DNS provider
///
/// Built per solver call from that call's base URL. The token obtained by
/// [`DnsProvider::authorize`] is handed back to the caller and not retained.
#[derive(Debug)]
pub struct BetterWapiProvider {
    /// Base URL with any trailing slash removed
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl BetterWapiProvider {
    /// Create a new provider for `base_url`
    ///
    /// One trailing slash is stripped from the base URL. The auth request
    /// has no client-side timeout; record requests use [`RECORD_TIMEOUT`].
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut base_url = base_url.into();
        if base_url.is_empty() {
            return Err(Error::config("baseUrl is required"));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::client_init(format!("failed to build HTTP client: {}", e)))?;

        if base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { base_url, client })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_url(&self) -> String {
        format!("{}/api/auth/token", self.base_url)
    }

    fn record_url(&self, domain: &str) -> String {
        format!("{}/api/v1/domain/{}/record", self.base_url, domain)
    }

    /// Send a record request and return the status and body
    async fn send_record(
        &self,
        request: reqwest::RequestBuilder,
        token: &AuthToken,
        record: &DnsRecord,
    ) -> std::result::Result<(StatusCode, String), reqwest::Error> {
        let response = request
            .bearer_auth(token.as_str())
            .timeout(RECORD_TIMEOUT)
            .json(record)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        Ok((status, body))
    }
}

#[async_trait]
impl DnsProvider for BetterWapiProvider {
    /// Exchange login and secret for a bearer token
    ///
    /// ```http
    /// POST /api/auth/token
    /// Content-Type: application/json
    ///
    /// {"login": "...", "secret": "..."}
    /// ```
    async fn authorize(&self, credentials: &Credentials) -> Result<AuthToken> {
        tracing::debug!(url = %self.auth_url(), "Requesting API token");

        let response = self
            .client
            .post(self.auth_url())
            .json(&AuthRequest {
                login: &credentials.login,
                secret: &credentials.secret,
            })
            .send()
            .await
            .map_err(|e| Error::auth(format!("auth request failed: {}", e)))?;

        if response.status() != StatusCode::OK {
            return Err(Error::auth(format!(
                "auth request failed with status: {}",
                response.status().as_u16()
            )));
        }

        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("failed to decode auth response: {}", e)))?;

        Ok(AuthToken::new(body.token))
    }

    /// Create a TXT record
    ///
    /// ```http
    /// POST /api/v1/domain/:domain/record
    /// Authorization: Bearer <token>
    ///
    /// {"autocommit": true, "data": "...", "subdomain": "...", "ttl": 300, "type": "TXT"}
    /// ```
    async fn create_record(
        &self,
        token: &AuthToken,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<()> {
        tracing::info!(
            domain = %domain,
            subdomain = %record.subdomain,
            "Creating TXT record"
        );

        let request = self.client.post(self.record_url(domain));
        let (status, body) = self
            .send_record(request, token, record)
            .await
            .map_err(|e| {
                Error::record_create(None, format!("create record request failed: {}", e))
            })?;

        if status != StatusCode::CREATED {
            return Err(Error::record_create(Some(status.as_u16()), body));
        }

        Ok(())
    }

    /// Delete the TXT record matching subdomain, data and type
    ///
    /// ```http
    /// DELETE /api/v1/domain/:domain/record
    /// Authorization: Bearer <token>
    ///
    /// {"autocommit": true, "data": "...", "subdomain": "...", "ttl": 300, "type": "TXT"}
    /// ```
    async fn delete_record(
        &self,
        token: &AuthToken,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<()> {
        tracing::info!(
            domain = %domain,
            subdomain = %record.subdomain,
            "Deleting TXT record"
        );

        let request = self.client.delete(self.record_url(domain));
        let (status, body) = self
            .send_record(request, token, record)
            .await
            .map_err(|e| {
                Error::record_delete(None, format!("delete record request failed: {}", e))
            })?;

        if status != StatusCode::OK {
            return Err(Error::record_delete(Some(status.as_u16()), body));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating better-wapi providers
#[derive(Debug, Clone, Copy, Default)]
pub struct BetterWapiFactory;

impl DnsProviderFactory for BetterWapiFactory {
    fn create(&self, config: &SolverConfig) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(BetterWapiProvider::new(config.base_url.clone())?))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
