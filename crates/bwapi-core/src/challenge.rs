//! Challenge request as delivered by the hosting runtime
//!
//! The solver only consumes `resolved_fqdn`, `key`, `resource_namespace` and
//! `config`. The remaining fields are carried for logging.

use serde::{Deserialize, Serialize};

/// Action the host is asking for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeAction {
    /// Publish the challenge record
    #[default]
    #[serde(rename = "Present", alias = "present")]
    Present,
    /// Remove the challenge record
    #[serde(rename = "CleanUp", alias = "cleanup")]
    CleanUp,
}

/// A DNS-01 challenge request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeRequest {
    /// Host-assigned identifier of the request
    pub uid: String,

    /// Requested action
    pub action: ChallengeAction,

    /// Challenge type, always "dns-01" in practice
    #[serde(rename = "type")]
    pub challenge_type: String,

    /// Name being validated (e.g. "foo.example.com")
    pub dns_name: String,

    /// Proof value to publish as the TXT record content
    pub key: String,

    /// Namespace the credential secrets are looked up in
    pub resource_namespace: String,

    /// Canonical challenge hostname, ending in '.'
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Zone the host resolved for the challenge, ending in '.'
    pub resolved_zone: String,

    /// Whether the solver may use ambient credentials
    pub allow_ambient_credentials: bool,

    /// Opaque solver configuration
    pub config: Option<serde_json::Value>,
}

impl ChallengeRequest {
    /// Create a request carrying only the fields the solver reads
    pub fn new(
        resolved_fqdn: impl Into<String>,
        key: impl Into<String>,
        resource_namespace: impl Into<String>,
        config: Option<serde_json::Value>,
    ) -> Self {
        Self {
            challenge_type: "dns-01".to_string(),
            key: key.into(),
            resource_namespace: resource_namespace.into(),
            resolved_fqdn: resolved_fqdn.into(),
            config,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_host_request_document() {
        let raw = r#"{
            "uid": "9c1f",
            "action": "CleanUp",
            "type": "dns-01",
            "dnsName": "foo.example.com",
            "key": "proof123",
            "resourceNamespace": "cert-manager",
            "resolvedFQDN": "_acme-challenge.foo.example.com.",
            "resolvedZone": "example.com.",
            "allowAmbientCredentials": false,
            "config": { "baseUrl": "https://api.example.net" }
        }"#;

        let request: ChallengeRequest = serde_json::from_str(raw).unwrap();

        assert_eq!(request.action, ChallengeAction::CleanUp);
        assert_eq!(request.resolved_fqdn, "_acme-challenge.foo.example.com.");
        assert_eq!(request.resource_namespace, "cert-manager");
        assert_eq!(request.key, "proof123");
        assert!(request.config.is_some());
    }

    #[test]
    fn test_decode_host_action_casing() {
        let request: ChallengeRequest = serde_json::from_str(r#"{"action":"Present"}"#).unwrap();
        assert_eq!(request.action, ChallengeAction::Present);

        let request: ChallengeRequest = serde_json::from_str(r#"{"action":"CleanUp"}"#).unwrap();
        assert_eq!(request.action, ChallengeAction::CleanUp);

        let request: ChallengeRequest = serde_json::from_str(r#"{"action":"cleanup"}"#).unwrap();
        assert_eq!(request.action, ChallengeAction::CleanUp);

        assert!(serde_json::from_str::<ChallengeRequest>(r#"{"action":"Renew"}"#).is_err());
    }

    #[test]
    fn test_action_encodes_in_host_casing() {
        assert_eq!(
            serde_json::to_string(&ChallengeAction::CleanUp).unwrap(),
            r#""CleanUp""#
        );
        assert_eq!(
            serde_json::to_string(&ChallengeAction::Present).unwrap(),
            r#""Present""#
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let request: ChallengeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.action, ChallengeAction::Present);
        assert!(request.config.is_none());
    }
}
