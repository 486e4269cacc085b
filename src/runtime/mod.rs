//! Tokio runtime adapters: spawner, spawned transport, HTTP client, and service.

#[cfg(feature = "http")]
pub mod http;
pub mod service;
pub mod tokio_spawner;
pub mod transport;

#[cfg(feature = "http")]
pub use http::SubsonicHttpClient;
pub use service::ScrobbleService;
pub use tokio_spawner::{Spawn, TokioSpawner};
pub use transport::{ScrobbleClient, SpawnedTransport};
