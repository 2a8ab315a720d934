//! The provider capability trait.

use async_trait::async_trait;
use podscale_tiers::{InstanceId, TierSpec};

use crate::error::ProviderResult;

/// A remote compute provider that can start and stop pods.
///
/// Every successful call changes what the provider bills for.
#[async_trait]
pub trait InstanceProvider: Send + Sync {
    /// Start a new pod sized for `tier` and return its id.
    async fn provision(&self, tier: &TierSpec) -> ProviderResult<InstanceId>;

    /// Stop the pod with the given id.
    ///
    /// Any non-success response is a failure, including responses that
    /// might mean "already stopped"; the caller decides whether to retry.
    async fn terminate(&self, instance: &InstanceId) -> ProviderResult<()>;

    /// Provider name (for logging).
    fn name(&self) -> &str;
}
