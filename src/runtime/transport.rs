//! Transport that runs each request as its own spawned task.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::core::{Completion, Param, Reply, RequestHandle, Transport};
use crate::runtime::Spawn;

/// Performs one remote call and reports what came back.
///
/// Implementations report network errors as [`Reply::Failed`]. A panic inside
/// `get` is caught by [`SpawnedTransport`] and reported the same way, so the
/// request still frees its slot.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_scrobble_queue::core::{Param, Reply};
/// use prometheus_scrobble_queue::runtime::ScrobbleClient;
///
/// #[derive(Clone)]
/// struct AlwaysOk;
///
/// #[async_trait]
/// impl ScrobbleClient for AlwaysOk {
///     async fn get(&self, _endpoint: &str, _params: Vec<Param>) -> Reply {
///         Reply::NoContent
///     }
/// }
/// ```
#[async_trait]
pub trait ScrobbleClient: Send + Sync + Clone + 'static {
    /// Call `endpoint` with the given ordered parameters.
    async fn get(&self, endpoint: &str, params: Vec<Param>) -> Reply;
}

/// [`Transport`] spawning one task per request and reporting completions over
/// a channel.
pub struct SpawnedTransport<C, S> {
    client: C,
    spawner: S,
    next_id: u64,
    in_flight: HashMap<RequestHandle, AbortHandle>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl<C, S> SpawnedTransport<C, S>
where
    C: ScrobbleClient,
    S: Spawn,
{
    /// Create a transport and the receiving end of its completion channel.
    pub fn new(client: C, spawner: S) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            client,
            spawner,
            next_id: 0,
            in_flight: HashMap::new(),
            completions: tx,
        };
        (transport, rx)
    }

    /// Number of spawned operations not yet released or aborted.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl<C, S> Transport for SpawnedTransport<C, S>
where
    C: ScrobbleClient,
    S: Spawn,
{
    fn dispatch(&mut self, endpoint: &str, params: Vec<Param>) -> RequestHandle {
        self.next_id += 1;
        let handle = RequestHandle::new(self.next_id);

        let client = self.client.clone();
        let completions = self.completions.clone();
        let endpoint = endpoint.to_string();
        let abort = self.spawner.spawn(async move {
            let reply = match AssertUnwindSafe(client.get(&endpoint, params))
                .catch_unwind()
                .await
            {
                Ok(reply) => reply,
                Err(_) => {
                    tracing::error!("scrobble client panicked while handling {}", handle);
                    Reply::Failed("scrobble client panicked".to_string())
                }
            };
            if completions.send(Completion { handle, reply }).is_err() {
                tracing::debug!("completion for {} dropped: queue gone", handle);
            }
        });

        self.in_flight.insert(handle, abort);
        handle
    }

    fn abort(&mut self, handle: RequestHandle) {
        if let Some(task) = self.in_flight.remove(&handle) {
            task.abort();
        }
    }

    fn release(&mut self, handle: RequestHandle) {
        self.in_flight.remove(&handle);
    }
}
