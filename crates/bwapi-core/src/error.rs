//! Error types for the DNS-01 challenge solver
//!
//! Every failure is terminal for the Present/CleanUp call that produced it.
//! The hosting runtime owns retry and backoff, so nothing here is retried.

use std::fmt;
use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stage of a Present/CleanUp call, used to prefix wrapped errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Decoding the per-challenge JSON configuration
    LoadConfig,
    /// Resolving the user login secret
    LoginSecret,
    /// Resolving the user secret secret
    SecretSecret,
    /// Splitting the resolved FQDN into domain and subdomain
    Decompose,
    /// Building the provider API client
    ProviderClient,
    /// Exchanging credentials for a bearer token
    Authorize,
    /// Creating the TXT record
    CreateRecord,
    /// Deleting the TXT record
    DeleteRecord,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self {
            Stage::LoadConfig => "error loading config",
            Stage::LoginSecret => "error getting user login secret",
            Stage::SecretSecret => "error getting user secret secret",
            Stage::Decompose => "invalid challenge FQDN",
            Stage::ProviderClient => "error creating provider client",
            Stage::Authorize => "authorization failed",
            Stage::CreateRecord => "failed to create DNS record",
            Stage::DeleteRecord => "failed to delete DNS record",
        };
        f.write_str(prefix)
    }
}

/// Core error type for the solver
#[derive(Error, Debug)]
pub enum Error {
    /// Per-challenge configuration could not be decoded
    #[error("error decoding solver config: {0}")]
    ConfigDecode(#[from] serde_json::Error),

    /// Secret object missing, or the store lookup itself failed
    #[error("failed to get secret {namespace}/{name}: {message}")]
    SecretNotFound {
        namespace: String,
        name: String,
        message: String,
    },

    /// Secret object exists but has no such key
    #[error("key {key} not found in secret {namespace}/{name}")]
    SecretKeyNotFound {
        namespace: String,
        name: String,
        key: String,
    },

    /// Secret value is not valid UTF-8
    #[error("key {key} in secret {namespace}/{name} is not valid UTF-8")]
    SecretNotUtf8 {
        namespace: String,
        name: String,
        key: String,
    },

    /// Token exchange failed (transport, status or body)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Record creation failed
    #[error("create record failed{}: {message}", status_suffix(.status))]
    RecordCreate {
        /// HTTP status, if a response was received
        status: Option<u16>,
        /// Response body or transport error
        message: String,
    },

    /// Record deletion failed
    #[error("delete record failed{}: {message}", status_suffix(.status))]
    RecordDelete {
        /// HTTP status, if a response was received
        status: Option<u16>,
        /// Response body or transport error
        message: String,
    },

    /// A client (secret store or HTTP) could not be constructed
    #[error("client initialization failed: {0}")]
    ClientInit(String),

    /// Malformed challenge input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Process configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error annotated with the stage that produced it
    #[error("{stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {}", code),
        None => String::new(),
    }
}

impl Error {
    /// Create a "secret not found" error
    pub fn secret_not_found(
        namespace: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SecretNotFound {
            namespace: namespace.into(),
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a record creation error
    pub fn record_create(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RecordCreate {
            status,
            message: message.into(),
        }
    }

    /// Create a record deletion error
    pub fn record_delete(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RecordDelete {
            status,
            message: message.into(),
        }
    }

    /// Create a client initialization error
    pub fn client_init(msg: impl Into<String>) -> Self {
        Self::ClientInit(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap this error with the stage that produced it
    pub fn in_stage(self, stage: Stage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Stage that produced this error, if it was wrapped
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The innermost error, with all stage wrappers removed
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Self::Stage { source, .. } = current {
            current = source;
        }
        current
    }

    /// Whether this error came from resolving a credential secret
    pub fn is_secret_lookup(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::SecretNotFound { .. }
                | Self::SecretKeyNotFound { .. }
                | Self::SecretNotUtf8 { .. }
        )
    }
}
