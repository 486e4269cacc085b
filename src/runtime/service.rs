//! Background service owning a [`ScrobbleQueue`].
//!
//! The queue lives inside a single actor task. Submissions from callers and
//! completions from the transport both arrive over channels, so every queue
//! mutation happens on that one task and no locking is needed around it.

use tokio::sync::{mpsc, oneshot};

use crate::core::{
    Completion, ErrorSink, PendingRequest, QueueLimits, QueueStats, ScrobbleError, ScrobbleQueue,
};
use crate::runtime::{ScrobbleClient, Spawn, SpawnedTransport};

enum Command {
    Submit(PendingRequest),
    Stats(oneshot::Sender<QueueStats>),
    Errors(oneshot::Sender<Vec<String>>),
    Shutdown(oneshot::Sender<QueueStats>),
}

/// Handle to a running scrobble queue.
///
/// Dropping the handle tears the queue down: in-flight requests are aborted
/// and the backlog is discarded.
pub struct ScrobbleService {
    commands: mpsc::UnboundedSender<Command>,
}

impl ScrobbleService {
    /// Start a queue that sends requests through `client`.
    pub fn start<C, S>(limits: QueueLimits, client: C, spawner: S) -> Self
    where
        C: ScrobbleClient,
        S: Spawn + Clone + Send + 'static,
    {
        Self::start_with_sink(limits, client, spawner, None)
    }

    /// Start a queue that also forwards reported errors to `sink`.
    pub fn start_with_sink<C, S>(
        limits: QueueLimits,
        client: C,
        spawner: S,
        sink: Option<Box<dyn ErrorSink>>,
    ) -> Self
    where
        C: ScrobbleClient,
        S: Spawn + Clone + Send + 'static,
    {
        let (transport, completions) = SpawnedTransport::new(client, spawner.clone());
        let mut queue = ScrobbleQueue::new(limits, transport);
        if let Some(sink) = sink {
            queue = queue.with_error_sink(sink);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        spawner.spawn(run_queue(queue, rx, completions));
        tracing::info!("scrobble service started");

        Self { commands: tx }
    }

    /// Queue a scrobble for `song_id` that started playing at `time_ms`.
    pub fn submit(
        &self,
        song_id: impl Into<String>,
        submission: bool,
        time_ms: i64,
    ) -> Result<(), ScrobbleError> {
        self.submit_request(PendingRequest::new(song_id, submission, time_ms))
    }

    /// Queue a scrobble stamped with the current time.
    pub fn submit_now(
        &self,
        song_id: impl Into<String>,
        submission: bool,
    ) -> Result<(), ScrobbleError> {
        self.submit_request(PendingRequest::now(song_id, submission))
    }

    /// Queue a prepared request.
    pub fn submit_request(&self, request: PendingRequest) -> Result<(), ScrobbleError> {
        self.commands
            .send(Command::Submit(request))
            .map_err(|_| ScrobbleError::ServiceStopped)
    }

    /// Current counters.
    pub async fn stats(&self) -> Result<QueueStats, ScrobbleError> {
        self.request(Command::Stats).await
    }

    /// Errors recorded so far, oldest first.
    pub async fn errors(&self) -> Result<Vec<String>, ScrobbleError> {
        self.request(Command::Errors).await
    }

    /// Stop the queue, returning the counters observed just before teardown.
    pub async fn shutdown(self) -> Result<QueueStats, ScrobbleError> {
        self.request(Command::Shutdown).await
    }

    /// Whether the actor task is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ScrobbleError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .map_err(|_| ScrobbleError::ServiceStopped)?;
        rx.await.map_err(|_| ScrobbleError::ServiceStopped)
    }
}

async fn run_queue<C, S>(
    mut queue: ScrobbleQueue<SpawnedTransport<C, S>>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    mut completions: mpsc::UnboundedReceiver<Completion>,
) where
    C: ScrobbleClient,
    S: Spawn,
{
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Submit(request)) => {
                    queue.submit(request);
                }
                Some(Command::Stats(reply)) => {
                    let _ = reply.send(queue.stats());
                }
                Some(Command::Errors(reply)) => {
                    let _ = reply.send(queue.errors().to_vec());
                }
                Some(Command::Shutdown(reply)) => {
                    let stats = queue.stats();
                    queue.cancel_all();
                    let _ = reply.send(stats);
                    break;
                }
                None => {
                    queue.cancel_all();
                    break;
                }
            },
            Some(completion) = completions.recv() => {
                queue.on_completion(completion.handle, completion.reply);
            }
        }
    }
    tracing::info!("scrobble service stopped");
}
