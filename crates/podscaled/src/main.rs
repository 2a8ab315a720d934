//! podscaled — the podscale daemon.
//!
//! Runs the GPU pod autoscaler until interrupted:
//! - reads configuration from the environment (and `.env`, if present)
//! - polls the media server's `/stats` for active sessions
//! - keeps one right-sized RunPod pod running, stopping it when idle
//!
//! # Usage
//!
//! ```text
//! RUNPOD_API_KEY=... LIVEKIT_API_KEY=... LIVEKIT_API_SECRET=... \
//! SARVAM_API_KEY=... GOOGLE_API_KEY=... podscaled
//! ```

mod config;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use podscale_autoscale::Autoscaler;
use podscale_metrics::HttpStatsSource;
use podscale_provider::RunPodProvider;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is the normal case in production.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,podscale=debug,podscaled=debug")
            }),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    run(config).await
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!("podscale daemon starting");

    // ── Session source ─────────────────────────────────────────

    let source = HttpStatsSource::new(&config.livekit_url, config.http_timeout)?;
    info!(url = %source.stats_url(), "session source initialized");

    // ── Compute provider ───────────────────────────────────────

    let provider = RunPodProvider::new(
        config.runpod_graphql_url.clone(),
        config.runpod_api_key.clone(),
        config.template.clone(),
        config.http_timeout,
    )?;
    info!(
        endpoint = %config.runpod_graphql_url,
        pod_prefix = %config.template.name_prefix,
        forwarded_env = config.template.env.len(),
        "compute provider initialized"
    );

    warn!("pods left running by a previous process are not tracked");

    let autoscaler = Autoscaler::new(Arc::new(source), Arc::new(provider), config.settings);

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!(error = %e, "failed to install CTRL+C handler");
                // Keep the sender alive so the loop is not told to stop.
                std::future::pending::<()>().await;
                drop(shutdown_tx);
            }
        }
    });

    // ── Autoscaler loop ────────────────────────────────────────

    autoscaler.run(shutdown_rx).await;

    info!("podscale daemon stopped");
    Ok(())
}
