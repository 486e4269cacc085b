//! Configuration models for the queue and the server connection.

pub mod scrobbler;

pub use scrobbler::{AuthMethod, QueueConfig, ScrobblerConfig, ServerConfig};
