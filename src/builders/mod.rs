//! Builders assembling queues and services from configuration.

pub mod service_builder;

#[cfg(feature = "http")]
pub use service_builder::{build_service, build_service_from_env, build_service_from_lookup};
pub use service_builder::build_queue;
