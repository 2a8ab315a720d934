//! Pod template: everything about a pod that does not depend on its tier.

use std::fmt;

use podscale_tiers::TierName;
use serde::{Deserialize, Serialize};

/// An environment variable injected into the pod.
///
/// Values are usually credentials, so `Debug` never prints them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Debug for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVar")
            .field("key", &self.key)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Tier-independent pod settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodTemplate {
    /// Pods are named `{name_prefix}-{tier}`.
    pub name_prefix: String,
    /// `SECURE` or `COMMUNITY`.
    pub cloud_type: String,
    /// Port mappings in RunPod's `port/proto` list syntax.
    pub ports: String,
    pub volume_in_gb: u32,
    pub container_disk_in_gb: u32,
    pub docker_args: String,
    /// Variables injected into every pod.
    pub env: Vec<EnvVar>,
}

impl PodTemplate {
    /// Name for a pod of the given tier.
    pub fn pod_name(&self, tier: TierName) -> String {
        format!("{}-{}", self.name_prefix, tier)
    }

    /// Replace the injected environment.
    pub fn with_env(mut self, env: Vec<EnvVar>) -> Self {
        self.env = env;
        self
    }
}

impl Default for PodTemplate {
    fn default() -> Self {
        Self {
            name_prefix: "tn-mla-voice".to_string(),
            cloud_type: "SECURE".to_string(),
            // Media signalling, TURN, and the RTP range.
            ports: "7880/http,7881/http,443/http,3478/udp,50000:60000/udp".to_string(),
            volume_in_gb: 50,
            container_disk_in_gb: 50,
            docker_args: String::new(),
            env: Vec::new(),
        }
    }
}
