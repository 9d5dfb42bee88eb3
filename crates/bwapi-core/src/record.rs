//! Values exchanged with the DNS provider
//!
//! None of these are persisted. A token lives for one Present/CleanUp call,
//! and a record is identified by its content rather than a provider ID.

use serde::{Deserialize, Serialize};
use std::fmt;

/// TTL of challenge records, in seconds
pub const CHALLENGE_TTL: u32 = 300;

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// TXT record
    Txt,
}

/// Desired remote record state
///
/// Serialises to the provider's record request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Apply the change without a separate publish step
    pub autocommit: bool,
    /// Record content
    pub data: String,
    /// Name relative to the registrable domain
    pub subdomain: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

impl DnsRecord {
    /// Build the TXT record for a challenge
    pub fn challenge(subdomain: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            autocommit: true,
            data: data.into(),
            subdomain: subdomain.into(),
            ttl: CHALLENGE_TTL,
            record_type: RecordType::Txt,
        }
    }
}

/// API credentials resolved from the secret store
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

/// Bearer token returned by the provider's auth endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value, for the Authorization header only
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<REDACTED>)")
    }
}
