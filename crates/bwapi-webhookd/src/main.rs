// # bwapi-webhookd - DNS-01 Challenge Solver Process
//
// This is a THIN integration layer. All challenge logic lives in
// bwapi-core and the backend crates.
//
// The process is responsible for:
// 1. Reading and validating startup configuration from the environment
// 2. Initializing logging and the runtime
// 3. Building the solver and initializing it from the ambient cluster config
// 4. Running one Present or CleanUp for a challenge request document
//
// ## Configuration
//
// - `GROUP_NAME`: API group the solver registers under (required)
// - `BWAPI_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// ## Usage
//
// ```bash
// export GROUP_NAME=acme.example.net
//
// bwapi-webhookd present request.json
// bwapi-webhookd cleanup < request.json
// ```
//
// The request document is the JSON form of a `ChallengeRequest`.

use anyhow::{Context, Result};
use bwapi_core::{ChallengeAction, ChallengeRequest, ChallengeSolver, Solver, StartupConfig};
use bwapi_provider::BetterWapiFactory;
use bwapi_secrets_kube::{KubeSecretStoreFactory, infer_cluster_config};
use std::env;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum WebhookExitCode {
    /// Challenge handled
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The challenge operation failed
    RuntimeError = 2,
}

impl From<WebhookExitCode> for ExitCode {
    fn from(code: WebhookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Command line invocation
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    action: ChallengeAction,
    /// Request document path, stdin when absent or "-"
    request_path: Option<String>,
}

impl Invocation {
    fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut args = args.into_iter().skip(1);

        let action = match args.next().as_deref() {
            Some("present") => ChallengeAction::Present,
            Some("cleanup") => ChallengeAction::CleanUp,
            Some(other) => anyhow::bail!("unknown action '{}'. Expected: present, cleanup", other),
            None => anyhow::bail!("usage: bwapi-webhookd <present|cleanup> [request.json]"),
        };

        let request_path = args.next().filter(|p| p != "-");

        if let Some(extra) = args.next() {
            anyhow::bail!("unexpected argument '{}'", extra);
        }

        Ok(Self {
            action,
            request_path,
        })
    }
}

/// Environment variable selecting the log level
const LOG_LEVEL_ENV: &str = "BWAPI_LOG_LEVEL";

/// Process configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
struct Config {
    startup: StartupConfig,
    log_level: String,
}

impl Config {
    /// Load configuration through a variable lookup function
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            startup: StartupConfig::from_lookup(&lookup)?,
            log_level: lookup(LOG_LEVEL_ENV).unwrap_or_else(|| "info".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => anyhow::bail!(
                "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                LOG_LEVEL_ENV,
                self.log_level
            ),
        }
    }
}

fn log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> ExitCode {
    let config = match Config::from_lookup(|key| env::var(key).ok()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return WebhookExitCode::ConfigError.into();
        }
    };

    let invocation = match Invocation::from_args(env::args()) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e);
            return WebhookExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&config.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return WebhookExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return WebhookExitCode::ConfigError.into();
        }
    };

    rt.block_on(async {
        let (solver, request) = match setup(config.startup, &invocation).await {
            Ok(ready) => ready,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return WebhookExitCode::ConfigError;
            }
        };

        let result = match invocation.action {
            ChallengeAction::Present => solver.present(&request).await,
            ChallengeAction::CleanUp => solver.clean_up(&request).await,
        };

        match result {
            Ok(()) => WebhookExitCode::Success,
            Err(e) => {
                error!("Challenge failed: {}", e);
                WebhookExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Build and initialize the solver, then load the request document
async fn setup(
    startup: StartupConfig,
    invocation: &Invocation,
) -> Result<(ChallengeSolver<KubeSecretStoreFactory>, ChallengeRequest)> {
    info!(group = %startup.group_name, "Starting bwapi-webhookd");

    let mut solver = ChallengeSolver::new(
        startup,
        Box::new(BetterWapiFactory),
        KubeSecretStoreFactory,
    );

    let cluster = infer_cluster_config().await?;
    solver.initialize(cluster, None)?;

    let request = read_request(invocation.request_path.as_deref()).await?;
    info!(
        solver = solver.name(),
        action = ?invocation.action,
        fqdn = %request.resolved_fqdn,
        "Challenge request loaded"
    );

    Ok((solver, request))
}

async fn read_request(path: Option<&str>) -> Result<ChallengeRequest> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read request document {}", path))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read request document from stdin")?;
            raw
        }
    };

    serde_json::from_str(&raw).context("failed to decode challenge request")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("bwapi-webhookd")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_actions() {
        let invocation = Invocation::from_args(args(&["present", "req.json"])).unwrap();
        assert_eq!(invocation.action, ChallengeAction::Present);
        assert_eq!(invocation.request_path.as_deref(), Some("req.json"));

        let invocation = Invocation::from_args(args(&["cleanup", "-"])).unwrap();
        assert_eq!(invocation.action, ChallengeAction::CleanUp);
        assert_eq!(invocation.request_path, None);
    }

    #[test]
    fn test_reject_bad_invocations() {
        assert!(Invocation::from_args(args(&[])).is_err());
        assert!(Invocation::from_args(args(&["renew"])).is_err());
        assert!(Invocation::from_args(args(&["present", "a.json", "b.json"])).is_err());
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults_and_log_level_validation() {
        let config =
            Config::from_lookup(lookup_from(&[("GROUP_NAME", "acme.example.net")])).unwrap();
        assert_eq!(config.startup, StartupConfig::new("acme.example.net"));
        assert_eq!(config.log_level, "info");

        let config = Config::from_lookup(lookup_from(&[
            ("GROUP_NAME", "acme.example.net"),
            ("BWAPI_LOG_LEVEL", "DEBUG"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "DEBUG");

        let err = Config::from_lookup(lookup_from(&[
            ("GROUP_NAME", "acme.example.net"),
            ("BWAPI_LOG_LEVEL", "verbose"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_config_requires_group_name() {
        let err = Config::from_lookup(lookup_from(&[("BWAPI_LOG_LEVEL", "info")])).unwrap_err();
        assert!(err.to_string().contains("GROUP_NAME must be specified"));
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(log_level("DEBUG"), Level::DEBUG);
        assert_eq!(log_level("error"), Level::ERROR);
        assert_eq!(log_level("info"), Level::INFO);
    }

    #[tokio::test]
    async fn test_read_request_from_file() {
        let path = std::env::temp_dir().join(format!("bwapi-request-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"{
                "uid": "9c1f",
                "action": "CleanUp",
                "type": "dns-01",
                "resolvedFQDN": "_acme-challenge.example.com.",
                "key": "proof"
            }"#,
        )
        .await
        .unwrap();

        let request = read_request(path.to_str()).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(request.action, ChallengeAction::CleanUp);
        assert_eq!(request.resolved_fqdn, "_acme-challenge.example.com.");
        assert_eq!(request.key, "proof");
    }
}
