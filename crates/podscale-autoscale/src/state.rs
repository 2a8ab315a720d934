//! What the autoscaler believes is running.
//!
//! There is no store of record behind this: a restarted process starts
//! empty and forgets any pod a previous process left running.

use std::time::Duration;

use podscale_tiers::{InstanceId, TierName};
use tokio::time::Instant;

use crate::idle::IdleTracker;

/// The pod the autoscaler believes is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningInstance {
    pub id: InstanceId,
    pub tier: TierName,
}

/// All mutable autoscaler state, threaded through each cycle.
#[derive(Debug, Clone)]
pub struct ScalerState {
    /// Current pod; `None` means tier "none".
    pub(crate) instance: Option<RunningInstance>,
    pub(crate) idle: IdleTracker,
    /// An idle stop failed and should be retried while sessions stay at zero.
    pub(crate) stop_pending: bool,
    /// Consecutive resizes blocked by a failed stop of the old pod.
    pub(crate) blocked_replaces: u32,
}

impl ScalerState {
    /// Empty state: no pod, not idle.
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            instance: None,
            idle: IdleTracker::new(idle_timeout),
            stop_pending: false,
            blocked_replaces: 0,
        }
    }

    /// State that already tracks a running pod.
    pub fn with_instance(
        idle_timeout: Duration,
        id: impl Into<InstanceId>,
        tier: TierName,
    ) -> Self {
        Self {
            instance: Some(RunningInstance {
                id: id.into(),
                tier,
            }),
            ..Self::new(idle_timeout)
        }
    }

    pub fn instance(&self) -> Option<&RunningInstance> {
        self.instance.as_ref()
    }

    pub fn current_instance_id(&self) -> Option<&InstanceId> {
        self.instance.as_ref().map(|i| &i.id)
    }

    /// Current tier, `None` when no pod is running.
    pub fn current_tier(&self) -> Option<TierName> {
        self.instance.as_ref().map(|i| i.tier)
    }

    pub fn idle_since(&self) -> Option<Instant> {
        self.idle.idle_since()
    }

    pub fn stop_pending(&self) -> bool {
        self.stop_pending
    }

    pub fn blocked_replaces(&self) -> u32 {
        self.blocked_replaces
    }
}
