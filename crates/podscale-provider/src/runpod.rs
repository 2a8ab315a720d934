//! RunPod GraphQL client.

use std::time::Duration;

use async_trait::async_trait;
use podscale_tiers::{InstanceId, TierSpec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::InstanceProvider;
use crate::template::{EnvVar, PodTemplate};

/// RunPod's public GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.runpod.io/graphql";

const DEPLOY_MUTATION: &str = "mutation Deploy($input: PodFindAndDeployOnDemandInput) { \
     podFindAndDeployOnDemand(input: $input) { \
     id machineId machine { gpuDisplayName } } }";

const STOP_MUTATION: &str =
    "mutation Stop($input: PodStopInput!) { podStop(input: $input) { id } }";

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: Variables<V>,
}

#[derive(Serialize)]
struct Variables<V> {
    input: V,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployInput<'a> {
    cloud_type: &'a str,
    gpu_type_id: &'a str,
    name: String,
    image_name: &'a str,
    docker_args: &'a str,
    ports: &'a str,
    volume_in_gb: u32,
    container_disk_in_gb: u32,
    env: &'a [EnvVar],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StopInput<'a> {
    pod_id: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployData {
    pod_find_and_deploy_on_demand: Option<DeployedPod>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployedPod {
    id: String,
    machine_id: Option<String>,
    machine: Option<Machine>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Machine {
    gpu_display_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StopData {
    pod_stop: Option<serde_json::Value>,
}

/// Why a mutation produced no data.
#[derive(Debug, Error)]
enum MutateError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response: {0}")]
    Decode(#[source] reqwest::Error),

    /// GraphQL `errors` entries, joined.
    #[error("{0}")]
    GraphQl(String),

    #[error("response carried no data")]
    NoData,
}

// ── Client ─────────────────────────────────────────────────────────

/// Provisions pods through RunPod's GraphQL API.
pub struct RunPodProvider {
    endpoint: String,
    api_key: String,
    template: PodTemplate,
    client: reqwest::Client,
}

impl RunPodProvider {
    /// Create a provider with a request timeout applied to every call.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        template: PodTemplate,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            template,
            client,
        })
    }

    /// The template applied to every provisioned pod.
    pub fn template(&self) -> &PodTemplate {
        &self.template
    }

    /// POST a mutation and decode its `data`, mapping transport errors,
    /// non-2xx statuses, and GraphQL `errors` to a [`MutateError`].
    async fn mutate<V, T>(&self, query: &str, input: V) -> Result<T, MutateError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request = GraphQlRequest {
            query,
            variables: Variables { input },
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(MutateError::Request)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MutateError::Status { status, body });
        }

        let body: GraphQlResponse<T> = resp.json().await.map_err(MutateError::Decode)?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(MutateError::GraphQl(messages.join("; ")));
        }

        body.data.ok_or(MutateError::NoData)
    }
}

#[async_trait]
impl InstanceProvider for RunPodProvider {
    async fn provision(&self, tier: &TierSpec) -> ProviderResult<InstanceId> {
        let input = DeployInput {
            cloud_type: &self.template.cloud_type,
            gpu_type_id: &tier.gpu_type,
            name: self.template.pod_name(tier.name),
            image_name: &tier.template_id,
            docker_args: &self.template.docker_args,
            ports: &self.template.ports,
            volume_in_gb: self.template.volume_in_gb,
            container_disk_in_gb: self.template.container_disk_in_gb,
            env: &self.template.env,
        };

        debug!(tier = %tier.name, gpu = %tier.gpu_type, "requesting pod");

        let data: DeployData = self
            .mutate(DEPLOY_MUTATION, input)
            .await
            .map_err(|e| {
                error!(tier = %tier.name, error = %e, "failed to create pod");
                ProviderError::ProvisionFailed {
                    tier: tier.name,
                    message: e.to_string(),
                }
            })?;

        // RunPod answers with a null pod when no machine has the GPU free.
        let pod = data.pod_find_and_deploy_on_demand.ok_or_else(|| {
            error!(tier = %tier.name, gpu = %tier.gpu_type, "no capacity for pod");
            ProviderError::ProvisionFailed {
                tier: tier.name,
                message: format!("no {} capacity available", tier.gpu_type),
            }
        })?;

        info!(
            tier = %tier.name,
            pod = %pod.id,
            machine = pod.machine_id.as_deref().unwrap_or("-"),
            gpu = pod
                .machine
                .as_ref()
                .and_then(|m| m.gpu_display_name.as_deref())
                .unwrap_or(tier.gpu_type.as_str()),
            "created pod"
        );

        Ok(pod.id)
    }

    async fn terminate(&self, instance: &InstanceId) -> ProviderResult<()> {
        let data: StopData = self
            .mutate(STOP_MUTATION, StopInput { pod_id: instance })
            .await
            .map_err(|e| {
                error!(pod = %instance, error = %e, "failed to stop pod");
                ProviderError::TerminationFailed {
                    instance: instance.clone(),
                    message: e.to_string(),
                }
            })?;

        if data.pod_stop.is_none() {
            return Err(ProviderError::TerminationFailed {
                instance: instance.clone(),
                message: "provider returned no pod".to_string(),
            });
        }

        info!(pod = %instance, "stopped pod");
        Ok(())
    }

    fn name(&self) -> &str {
        "runpod"
    }
}
