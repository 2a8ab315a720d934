//! Tracks how long sessions have been at zero.
//!
//! The tracker only measures time. It knows nothing about pods; the
//! scaler decides what an expired idle episode means.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

/// Default time sessions must stay at zero before a pod is stopped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(1800);

/// What one observation told the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleSignal {
    /// Sessions are active; any idle episode was cancelled.
    Busy,
    /// Sessions just reached zero; a new idle episode began.
    IdleStarted,
    /// Still idle, but the timeout has not elapsed.
    Idle,
    /// The idle episode outlasted the timeout. Emitted once per episode.
    IdleExpired,
}

/// Tracks the current idle episode.
#[derive(Debug, Clone)]
pub struct IdleTracker {
    timeout: Duration,
    /// Start of the current idle episode.
    idle_since: Option<Instant>,
}

impl IdleTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            idle_since: None,
        }
    }

    /// Record a session count sampled at `now`.
    ///
    /// An expired episode is consumed when it is reported, whether or not
    /// the caller acts on it; the next zero sample starts a fresh episode.
    pub fn observe(&mut self, sessions: u32, now: Instant) -> IdleSignal {
        if sessions > 0 {
            if self.idle_since.take().is_some() {
                debug!("sessions resumed, idle timer cleared");
            }
            return IdleSignal::Busy;
        }

        match self.idle_since {
            None => {
                self.idle_since = Some(now);
                info!(timeout_secs = self.timeout.as_secs(), "idle timer started");
                IdleSignal::IdleStarted
            }
            Some(since) => {
                let elapsed = now.saturating_duration_since(since);
                if elapsed >= self.timeout {
                    self.idle_since = None;
                    info!(idle_secs = elapsed.as_secs(), "idle timeout reached");
                    IdleSignal::IdleExpired
                } else {
                    IdleSignal::Idle
                }
            }
        }
    }

    /// Start of the current idle episode, if any.
    pub fn idle_since(&self) -> Option<Instant> {
        self.idle_since
    }

    /// How long the current episode has lasted at `now`.
    pub fn idle_for(&self, now: Instant) -> Option<Duration> {
        self.idle_since
            .map(|since| now.saturating_duration_since(since))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for IdleTracker {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}
