//! Session sources.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Point-in-time load reported by the media server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Active rooms, one per voice session.
    #[serde(rename = "num_rooms", default)]
    pub active_sessions: u32,
    /// Participants across all rooms.
    #[serde(rename = "num_participants", default)]
    pub participants: u32,
}

impl SessionStats {
    /// Stats for an idle (or unreachable) server.
    pub const ZERO: SessionStats = SessionStats {
        active_sessions: 0,
        participants: 0,
    };
}

/// Something that reports current session load.
///
/// Implementations fail open: any error is logged and reported as
/// [`SessionStats::ZERO`].
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Fetch current load.
    async fn fetch(&self) -> SessionStats;
}

/// Why a stats request produced no usable reading.
#[derive(Debug, Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed stats body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Reads stats from `GET {base_url}/stats`.
pub struct HttpStatsSource {
    stats_url: String,
    client: reqwest::Client,
}

impl HttpStatsSource {
    /// Create a source for the server at `base_url` with a request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a source that reuses an existing client.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            stats_url: format!("{}/stats", base_url.trim_end_matches('/')),
            client,
        }
    }

    /// The full URL polled for stats.
    pub fn stats_url(&self) -> &str {
        &self.stats_url
    }

    async fn try_fetch(&self) -> Result<SessionStats, FetchError> {
        let resp = self
            .client
            .get(&self.stats_url)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        resp.json::<SessionStats>().await.map_err(FetchError::Decode)
    }
}

#[async_trait]
impl SessionSource for HttpStatsSource {
    async fn fetch(&self) -> SessionStats {
        match self.try_fetch().await {
            Ok(stats) => {
                debug!(
                    url = %self.stats_url,
                    sessions = stats.active_sessions,
                    participants = stats.participants,
                    "fetched session stats"
                );
                stats
            }
            Err(e) => {
                error!(
                    url = %self.stats_url,
                    error = %e,
                    "failed to fetch session stats, assuming idle"
                );
                SessionStats::ZERO
            }
        }
    }
}
