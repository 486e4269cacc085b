//! Builders to construct scrobble queues and services from configuration.

use crate::config::QueueConfig;
use crate::core::{ScrobbleError, ScrobbleQueue, Transport};

#[cfg(feature = "http")]
use anyhow::Context;

#[cfg(feature = "http")]
use crate::config::ScrobblerConfig;
#[cfg(feature = "http")]
use crate::core::AppResult;
#[cfg(feature = "http")]
use crate::runtime::{ScrobbleService, Spawn, SubsonicHttpClient};

/// Build an admission queue around `transport` after validating `cfg`.
pub fn build_queue<T: Transport>(
    cfg: &QueueConfig,
    transport: T,
) -> Result<ScrobbleQueue<T>, ScrobbleError> {
    cfg.validate()
        .map_err(|e| ScrobbleError::Config(format!("queue invalid: {e}")))?;
    Ok(ScrobbleQueue::new(cfg.limits(), transport))
}

/// Validate `cfg`, create the HTTP client, and start a service on `spawner`.
#[cfg(feature = "http")]
pub fn build_service<S>(cfg: &ScrobblerConfig, spawner: S) -> Result<ScrobbleService, ScrobbleError>
where
    S: Spawn + Clone + Send + 'static,
{
    cfg.validate().map_err(ScrobbleError::Config)?;
    let client = SubsonicHttpClient::new(&cfg.server)?;
    tracing::info!(
        "scrobbling to {} as {} (max {} concurrent)",
        cfg.server.server_url,
        cfg.server.username,
        cfg.queue.max_concurrent_requests
    );
    Ok(ScrobbleService::start(cfg.queue.limits(), client, spawner))
}

/// Read configuration through `lookup` and start a service on `spawner`.
///
/// See [`ScrobblerConfig::from_lookup`] for the keys consulted.
#[cfg(feature = "http")]
pub fn build_service_from_lookup<F, S>(lookup: F, spawner: S) -> AppResult<ScrobbleService>
where
    F: Fn(&str) -> Option<String>,
    S: Spawn + Clone + Send + 'static,
{
    let cfg = ScrobblerConfig::from_lookup(lookup)
        .map_err(anyhow::Error::msg)
        .context("loading scrobbler configuration")?;
    build_service(&cfg, spawner).context("starting scrobble service")
}

/// Start a service configured from the process environment and `.env`.
#[cfg(feature = "http")]
pub fn build_service_from_env<S>(spawner: S) -> AppResult<ScrobbleService>
where
    S: Spawn + Clone + Send + 'static,
{
    let cfg = ScrobblerConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("loading scrobbler configuration")?;
    build_service(&cfg, spawner).context("starting scrobble service")
}
