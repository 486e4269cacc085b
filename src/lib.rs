//! # Prometheus Scrobble Queue
//!
//! A bounded-concurrency queue for scrobble (playback-report) submissions to
//! Subsonic-compatible music servers.
//!
//! Players report "now playing" notices and final scrobbles far faster than a
//! polite client should hit the server. This crate admits a fixed number of
//! requests at a time, parks the rest in a FIFO backlog, and drains it as
//! in-flight requests complete. Every reply is classified, and no outcome
//! (success, server error, malformed reply, or network failure) ever stops the
//! backlog from flowing.
//!
//! ## Key Features
//!
//! - **Admission control**: at most `max_concurrent_requests` (default 3) in flight
//! - **FIFO backlog**: unbounded, dispatched strictly in submission order
//! - **Response classification**: success, protocol error, or malformed reply
//! - **Error log**: every reported error is kept for later display
//! - **Clean teardown**: in-flight requests are aborted, late completions ignored
//!
//! ## ScrobbleQueue - Synchronous Core
//!
//! The core queue is a plain state machine driven by the caller. Any
//! [`Transport`](core::Transport) can back it:
//!
//! ```rust,ignore
//! use prometheus_scrobble_queue::core::{PendingRequest, QueueLimits, Reply, ScrobbleQueue};
//!
//! let mut queue = ScrobbleQueue::new(QueueLimits::default(), my_transport);
//! queue.submit(PendingRequest::now("song-1", false));
//!
//! // later, when the transport reports back
//! queue.on_completion(handle, Reply::NoContent);
//! ```
//!
//! ## ScrobbleService - Tokio Runtime
//!
//! With the default features the queue runs inside a tokio task and talks to
//! the server over HTTP:
//!
//! ```rust,ignore
//! use prometheus_scrobble_queue::builders::build_service;
//! use prometheus_scrobble_queue::config::ScrobblerConfig;
//! use prometheus_scrobble_queue::runtime::TokioSpawner;
//!
//! let cfg = ScrobblerConfig::from_env()?;
//! let service = build_service(&cfg, TokioSpawner::current())?;
//! service.submit_now("song-1", true)?;
//! let errors = service.errors().await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Admission queue, response classification, and transport abstraction.
pub mod core;
/// Configuration models for the queue and the server connection.
pub mod config;
/// Builders to construct queues and services from configuration.
pub mod builders;
/// Tokio runtime adapters and the HTTP client.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;
