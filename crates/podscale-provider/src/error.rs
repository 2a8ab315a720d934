//! Provider error types.

use podscale_tiers::{InstanceId, TierName};
use thiserror::Error;

/// Errors returned by an [`InstanceProvider`](crate::InstanceProvider).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("failed to provision {tier} pod: {message}")]
    ProvisionFailed { tier: TierName, message: String },

    #[error("failed to stop pod {instance}: {message}")]
    TerminationFailed { instance: InstanceId, message: String },

    #[error("failed to build provider client: {0}")]
    Client(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
