//! Configuration types for the solver
//!
//! Two layers of configuration exist:
//! - [`SolverConfig`]: per-challenge JSON supplied with every request
//! - [`StartupConfig`]: process-level settings, validated once at boot

use serde::{Deserialize, Serialize};

/// Reference to a value inside a namespaced secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    /// Name of the secret object
    #[serde(default)]
    pub name: String,

    /// Key inside the secret's data
    #[serde(default)]
    pub key: String,
}

impl SecretRef {
    /// Create a new secret reference
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// Per-challenge solver configuration
///
/// Decoded from the opaque JSON blob attached to each challenge request.
/// An absent blob yields the zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Provider API base URL (e.g. "https://wapi.example.net/")
    #[serde(default)]
    pub base_url: String,

    /// Secret holding the API login
    #[serde(default)]
    pub user_login_secret_ref: SecretRef,

    /// Secret holding the API secret
    #[serde(default)]
    pub user_secret_secret_ref: SecretRef,
}

impl SolverConfig {
    /// Decode the configuration attached to a challenge
    ///
    /// `None` and JSON `null` both decode to the default configuration.
    pub fn decode(raw: Option<&serde_json::Value>) -> Result<Self, crate::Error> {
        match raw {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => Ok(Self::deserialize(value)?),
        }
    }
}

/// Environment variable naming the API group the solver registers under
pub const GROUP_NAME_ENV: &str = "GROUP_NAME";

/// Process-level configuration
///
/// Loaded once by the process entry point and passed by value into
/// [`crate::ChallengeSolver::new`]. Nothing reads the environment after boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// API group the solver is registered under
    pub group_name: String,
}

impl StartupConfig {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
        }
    }

    /// Load the configuration through a variable lookup function
    ///
    /// The daemon passes `|k| std::env::var(k).ok()`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::new(lookup(GROUP_NAME_ENV).unwrap_or_default());
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.group_name.trim().is_empty() {
            return Err(crate::Error::config(format!(
                "{} must be specified",
                GROUP_NAME_ENV
            )));
        }
        Ok(())
    }
}
