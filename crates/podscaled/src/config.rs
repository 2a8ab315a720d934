//! Daemon configuration, read once from the environment at startup.

use std::collections::HashMap;
use std::time::Duration;

use podscale_autoscale::ScalerSettings;
use podscale_provider::{DEFAULT_GRAPHQL_URL, EnvVar, PodTemplate};
use thiserror::Error;

/// Credentials forwarded into every pod so it can reach its services.
pub const FORWARDED_SECRETS: [&str; 4] = [
    "LIVEKIT_API_KEY",
    "LIVEKIT_API_SECRET",
    "SARVAM_API_KEY",
    "GOOGLE_API_KEY",
];

pub const DEFAULT_LIVEKIT_URL: &str = "http://localhost:7880";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value {value:?} for {key}: expected a positive whole number of seconds")]
    InvalidSeconds { key: String, value: String },
}

/// Everything the daemon needs to run.
pub struct Config {
    pub runpod_api_key: String,
    pub runpod_graphql_url: String,
    pub livekit_url: String,
    pub template: PodTemplate,
    pub settings: ScalerSettings,
    pub http_timeout: Duration,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = HashMap::new();
        for key in std::iter::once("RUNPOD_API_KEY").chain(FORWARDED_SECRETS) {
            match get(key) {
                Some(value) => {
                    required.insert(key, value);
                }
                None => missing.push(key.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let secs = |key: &str, default: u64| -> Result<Duration, ConfigError> {
            match get(key) {
                None => Ok(Duration::from_secs(default)),
                Some(value) => match value.trim().parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                    _ => Err(ConfigError::InvalidSeconds {
                        key: key.to_string(),
                        value,
                    }),
                },
            }
        };

        let defaults = ScalerSettings::default();
        let settings = ScalerSettings {
            poll_interval: secs("PODSCALE_POLL_INTERVAL_SECS", defaults.poll_interval.as_secs())?,
            idle_timeout: secs("PODSCALE_IDLE_TIMEOUT_SECS", defaults.idle_timeout.as_secs())?,
            error_backoff: secs("PODSCALE_ERROR_BACKOFF_SECS", defaults.error_backoff.as_secs())?,
        };
        let http_timeout = secs("PODSCALE_HTTP_TIMEOUT_SECS", 30)?;

        let mut template = PodTemplate::default().with_env(
            FORWARDED_SECRETS
                .iter()
                .map(|key| EnvVar::new(*key, required[key].clone()))
                .collect(),
        );
        if let Some(prefix) = get("PODSCALE_POD_NAME_PREFIX") {
            template.name_prefix = prefix;
        }

        Ok(Self {
            runpod_api_key: required["RUNPOD_API_KEY"].clone(),
            runpod_graphql_url: get("RUNPOD_GRAPHQL_URL")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
            livekit_url: get("LIVEKIT_URL").unwrap_or_else(|| DEFAULT_LIVEKIT_URL.to_string()),
            template,
            settings,
            http_timeout,
        })
    }
}
