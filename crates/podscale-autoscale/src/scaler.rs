//! Autoscaler: reconciles the running pod against session load.
//!
//! `reconcile` takes the current [`ScalerState`] by value and hands back
//! the next one, so a single decision can be exercised against a fake
//! provider without any networking. `run` threads the state through an
//! endless poll loop.

use std::sync::Arc;
use std::time::Duration;

use podscale_metrics::{SessionSource, SessionStats};
use podscale_provider::InstanceProvider;
use podscale_tiers::{InstanceId, TierCatalog, TierName, tier_label};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::idle::{DEFAULT_IDLE_TIMEOUT, IdleSignal};
use crate::policy::required_tier;
use crate::state::{RunningInstance, ScalerState};

/// Consecutive failed stops of the old pod after which a resize goes
/// ahead anyway and the old pod is abandoned.
pub const MAX_BLOCKED_REPLACES: u32 = 3;

/// Timing knobs for the scaling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalerSettings {
    /// Delay between successful cycles.
    pub poll_interval: Duration,
    /// Zero-session time before the pod is stopped.
    pub idle_timeout: Duration,
    /// Delay after a failed cycle.
    pub error_backoff: Duration,
}

impl Default for ScalerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(300),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            error_backoff: Duration::from_secs(60),
        }
    }
}

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No provider calls were needed.
    NoChange,
    /// The pod was stopped after the idle timeout.
    IdleStopped { instance: InstanceId },
    /// The idle stop failed; the pod is still tracked and the stop will
    /// be retried while sessions stay at zero.
    IdleStopFailed { instance: InstanceId },
    /// The pod was replaced by one of a different tier.
    Replaced {
        from: Option<TierName>,
        to: TierName,
        instance: InstanceId,
    },
    /// The old pod was stopped (if any) but the new one failed to start.
    /// State now holds no pod.
    ProvisionFailed { tier: TierName },
    /// The old pod could not be stopped, so no new pod was started.
    ReplaceBlocked { instance: InstanceId, tier: TierName },
}

impl CycleOutcome {
    /// Whether a provider call failed this cycle.
    ///
    /// Failed cycles are retried after the error backoff rather than the
    /// poll interval.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CycleOutcome::ProvisionFailed { .. }
                | CycleOutcome::IdleStopFailed { .. }
                | CycleOutcome::ReplaceBlocked { .. }
        )
    }
}

/// The autoscaler drives one pod through its provider.
pub struct Autoscaler {
    catalog: TierCatalog,
    source: Arc<dyn SessionSource>,
    provider: Arc<dyn InstanceProvider>,
    settings: ScalerSettings,
}

impl Autoscaler {
    /// Create an autoscaler over the standard tier catalog.
    pub fn new(
        source: Arc<dyn SessionSource>,
        provider: Arc<dyn InstanceProvider>,
        settings: ScalerSettings,
    ) -> Self {
        Self {
            catalog: TierCatalog::standard(),
            source,
            provider,
            settings,
        }
    }

    /// Use a different tier catalog.
    pub fn with_catalog(mut self, catalog: TierCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn settings(&self) -> &ScalerSettings {
        &self.settings
    }

    /// Fresh state for this autoscaler's idle timeout.
    pub fn initial_state(&self) -> ScalerState {
        ScalerState::new(self.settings.idle_timeout)
    }

    /// Fetch load and reconcile once.
    pub async fn cycle(
        &self,
        state: ScalerState,
        now: Instant,
    ) -> (ScalerState, anyhow::Result<CycleOutcome>) {
        let stats = self.source.fetch().await;
        self.reconcile(state, stats, now).await
    }

    /// Decide and act for one observation of `stats` at `now`.
    ///
    /// The returned state is always consistent with the provider calls
    /// that succeeded, even when the cycle itself reports an error.
    pub async fn reconcile(
        &self,
        mut state: ScalerState,
        stats: SessionStats,
        now: Instant,
    ) -> (ScalerState, anyhow::Result<CycleOutcome>) {
        let outcome = self.reconcile_in_place(&mut state, stats, now).await;
        if !matches!(outcome, Ok(CycleOutcome::ReplaceBlocked { .. })) {
            state.blocked_replaces = 0;
        }
        (state, outcome)
    }

    async fn reconcile_in_place(
        &self,
        state: &mut ScalerState,
        stats: SessionStats,
        now: Instant,
    ) -> anyhow::Result<CycleOutcome> {
        let sessions = stats.active_sessions;
        let required = required_tier(&self.catalog, sessions);

        info!(
            sessions,
            participants = stats.participants,
            current = tier_label(state.current_tier()),
            required = tier_label(required),
            "scaling check"
        );

        let signal = state.idle.observe(sessions, now);

        if state.stop_pending {
            if sessions == 0 {
                return Ok(self.stop_idle_pod(state).await);
            }
            info!("sessions resumed, abandoning pending pod stop");
            state.stop_pending = false;
        }

        if signal == IdleSignal::IdleExpired {
            if state.instance.is_some() {
                return Ok(self.stop_idle_pod(state).await);
            }
            debug!("idle timeout reached with no pod running");
            return Ok(CycleOutcome::NoChange);
        }

        // Zero sessions never provisions; the idle path handles shutdown.
        let Some(required) = required else {
            return Ok(CycleOutcome::NoChange);
        };
        if state.current_tier() == Some(required) {
            return Ok(CycleOutcome::NoChange);
        }

        let spec = self.catalog.lookup(required)?;
        let from = state.current_tier();
        info!(from = tier_label(from), to = %required, "scaling");

        if let Some(old) = &state.instance {
            if let Err(e) = self.provider.terminate(&old.id).await {
                state.blocked_replaces += 1;
                if state.blocked_replaces < MAX_BLOCKED_REPLACES {
                    warn!(
                        pod = %old.id,
                        error = %e,
                        attempts = state.blocked_replaces,
                        "could not stop current pod, postponing resize"
                    );
                    return Ok(CycleOutcome::ReplaceBlocked {
                        instance: old.id.clone(),
                        tier: required,
                    });
                }
                error!(
                    pod = %old.id,
                    error = %e,
                    attempts = state.blocked_replaces,
                    "giving up on stopping current pod, it may still be billing"
                );
            }
            state.instance = None;
        }

        match self.provider.provision(spec).await {
            Ok(id) => {
                state.instance = Some(RunningInstance {
                    id: id.clone(),
                    tier: required,
                });
                info!(
                    tier = %required,
                    monthly_usd = %format!("{:.2}", spec.monthly_cost()),
                    business_days_usd = %format!("{:.2}", spec.business_days_cost()),
                    "estimated cost"
                );
                Ok(CycleOutcome::Replaced {
                    from,
                    to: required,
                    instance: id,
                })
            }
            Err(e) => {
                error!(tier = %required, error = %e, "provisioning failed, no pod running");
                Ok(CycleOutcome::ProvisionFailed { tier: required })
            }
        }
    }

    /// Stop the tracked pod because sessions stayed at zero.
    async fn stop_idle_pod(&self, state: &mut ScalerState) -> CycleOutcome {
        let Some(pod) = state.instance.take() else {
            state.stop_pending = false;
            return CycleOutcome::NoChange;
        };

        info!(pod = %pod.id, tier = %pod.tier, "stopping idle pod");
        match self.provider.terminate(&pod.id).await {
            Ok(()) => {
                state.stop_pending = false;
                CycleOutcome::IdleStopped { instance: pod.id }
            }
            Err(e) => {
                warn!(pod = %pod.id, error = %e, "idle stop failed, will retry");
                let instance = pod.id.clone();
                state.instance = Some(pod);
                state.stop_pending = true;
                CycleOutcome::IdleStopFailed { instance }
            }
        }
    }

    /// Run cycles until `shutdown` fires, returning the final state.
    ///
    /// A failed cycle is logged and followed by the shorter error backoff.
    /// Shutdown does not stop the running pod.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> ScalerState {
        info!(
            provider = self.provider.name(),
            poll_secs = self.settings.poll_interval.as_secs(),
            idle_timeout_secs = self.settings.idle_timeout.as_secs(),
            "autoscaler started"
        );

        let mut state = self.initial_state();

        loop {
            if *shutdown.borrow() {
                break;
            }

            let (next, result) = self.cycle(state, Instant::now()).await;
            state = next;

            let wait = match result {
                Ok(outcome) if outcome.is_failure() => {
                    warn!(
                        ?outcome,
                        backoff_secs = self.settings.error_backoff.as_secs(),
                        "cycle failed, retrying after backoff"
                    );
                    self.settings.error_backoff
                }
                Ok(outcome) => {
                    debug!(?outcome, "cycle complete");
                    self.settings.poll_interval
                }
                Err(e) => {
                    error!(error = %e, "scaling cycle failed");
                    self.settings.error_backoff
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => break,
            }
        }

        if let Some(pod) = state.instance() {
            info!(pod = %pod.id, tier = %pod.tier, "autoscaler shutting down, pod left running");
        } else {
            info!("autoscaler shutting down");
        }
        state
    }
}
