//! podscale-provider — creating and stopping GPU pods.
//!
//! The autoscaler talks to its compute provider through the narrow
//! [`InstanceProvider`] trait: `provision` a pod for a tier, `terminate`
//! a pod by id. Neither operation retries; retry policy belongs to the
//! caller, which must update its own state between calls so a single
//! logical transition never bills twice.
//!
//! [`RunPodProvider`] implements the trait against RunPod's GraphQL API:
//!
//! ```text
//! provision ──► podFindAndDeployOnDemand(input: {gpuTypeId, name, ports, env, ...})
//! terminate ──► podStop(input: {podId})
//! ```

pub mod error;
pub mod provider;
pub mod runpod;
pub mod template;

pub use error::{ProviderError, ProviderResult};
pub use provider::InstanceProvider;
pub use runpod::{DEFAULT_GRAPHQL_URL, RunPodProvider};
pub use template::{EnvVar, PodTemplate};
