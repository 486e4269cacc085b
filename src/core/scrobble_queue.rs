//! Admission queue with capacity accounting and FIFO backlog.

use std::collections::{HashSet, VecDeque};

use serde_json::Value;

use crate::core::{
    classify, encode_params, ErrorLog, ErrorSink, Outcome, PendingRequest, Reply, RequestHandle,
    Transport, SCROBBLE_ENDPOINT,
};

/// Default number of scrobble requests allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 3;

/// Configuration values for capacity enforcement.
#[derive(Debug, Clone)]
pub struct QueueLimits {
    /// Maximum concurrent in-flight requests.
    pub max_concurrent_requests: usize,
}

impl Default for QueueLimits {
    fn default() -> Self {
        Self {
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

/// What happened to a request handed to [`ScrobbleQueue::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SubmitStatus {
    /// Dispatched to the transport during the call.
    Dispatched,
    /// Waiting in the backlog for capacity.
    Queued,
    /// Discarded because the queue was torn down.
    Dropped,
}

/// Point-in-time view of the queue.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueueStats {
    /// Requests in flight.
    pub active: usize,
    /// Requests waiting in the backlog.
    pub pending: usize,
    /// Configured concurrency limit.
    pub max_concurrent: usize,
    /// Number of errors recorded so far.
    pub errors: usize,
}

/// Bounded-concurrency scrobble queue.
///
/// Requests are dispatched in submission order while fewer than
/// `max_concurrent_requests` are in flight; the rest wait in the backlog until
/// a completion frees a slot. The active set is the only source of the active
/// count, so the two can never disagree.
pub struct ScrobbleQueue<T: Transport> {
    limits: QueueLimits,
    transport: T,
    backlog: VecDeque<PendingRequest>,
    /// Handles whose completion we still care about.
    active: HashSet<RequestHandle>,
    errors: ErrorLog,
    sink: Option<Box<dyn ErrorSink>>,
    closed: bool,
}

impl<T: Transport> ScrobbleQueue<T> {
    /// Create a new queue around a transport.
    pub fn new(limits: QueueLimits, transport: T) -> Self {
        Self {
            limits,
            transport,
            backlog: VecDeque::new(),
            active: HashSet::new(),
            errors: ErrorLog::new(),
            sink: None,
            closed: false,
        }
    }

    /// Forward every reported error to an additional sink.
    #[must_use]
    pub fn with_error_sink(mut self, sink: Box<dyn ErrorSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Append a request to the backlog and dispatch as much as capacity allows.
    pub fn submit(&mut self, request: PendingRequest) -> SubmitStatus {
        if self.closed {
            tracing::warn!("scrobble for {} dropped: queue closed", request.song_id);
            return SubmitStatus::Dropped;
        }

        tracing::debug!(
            "scrobble queued for {} (submission={})",
            request.song_id,
            request.submission
        );
        self.backlog.push_back(request);

        if self.has_capacity() && self.drain() > 0 && self.backlog.is_empty() {
            SubmitStatus::Dispatched
        } else {
            SubmitStatus::Queued
        }
    }

    /// Process the completion of `handle`.
    ///
    /// Returns `None` when the handle is unknown, already completed, or was
    /// cancelled by [`cancel_all`](Self::cancel_all).
    pub fn on_completion(&mut self, handle: RequestHandle, reply: Reply) -> Option<Outcome> {
        if !self.active.remove(&handle) {
            tracing::debug!("ignoring completion for unknown request {}", handle);
            return None;
        }
        self.transport.release(handle);

        if let Reply::Failed(reason) = &reply {
            tracing::warn!("scrobble request {} failed: {}", handle, reason);
            self.report_error(reason, None);
        }

        let outcome = classify(reply.payload());
        if let Some(message) = outcome.error_message() {
            self.report_error(&message, outcome.debug_value());
        } else {
            tracing::debug!("scrobble request {} completed", handle);
        }

        self.drain();
        Some(outcome)
    }

    /// Abort every in-flight request and discard the backlog.
    ///
    /// Handles leave the active set before they are aborted, so a completion
    /// raised by the abort itself is ignored.
    pub fn cancel_all(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let handles: Vec<RequestHandle> = self.active.drain().collect();
        let dropped = self.backlog.len();
        self.backlog.clear();

        for handle in &handles {
            self.transport.abort(*handle);
        }
        tracing::info!(
            "scrobble queue closed: aborted {} in flight, dropped {} pending",
            handles.len(),
            dropped
        );
    }

    /// Requests currently in flight.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Requests waiting for capacity.
    pub fn pending_count(&self) -> usize {
        self.backlog.len()
    }

    /// Whether `handle` is in flight.
    pub fn is_active(&self, handle: RequestHandle) -> bool {
        self.active.contains(&handle)
    }

    /// Errors recorded so far, oldest first.
    pub fn errors(&self) -> &[String] {
        self.errors.messages()
    }

    /// Whether [`cancel_all`](Self::cancel_all) has run.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Configured limits.
    pub const fn limits(&self) -> &QueueLimits {
        &self.limits
    }

    /// Transport owned by the queue.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of counters.
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            active: self.active.len(),
            pending: self.backlog.len(),
            max_concurrent: self.limits.max_concurrent_requests,
            errors: self.errors.len(),
        }
    }

    fn has_capacity(&self) -> bool {
        self.active.len() < self.limits.max_concurrent_requests
    }

    /// Dispatch from the head of the backlog until it is empty or capacity is
    /// exhausted. Returns how many requests were started.
    fn drain(&mut self) -> usize {
        let mut started = 0;
        while self.has_capacity() {
            let Some(request) = self.backlog.pop_front() else {
                break;
            };

            let params = encode_params(&request);
            let handle = self.transport.dispatch(SCROBBLE_ENDPOINT, params);
            self.active.insert(handle);
            started += 1;

            tracing::debug!(
                "dispatched scrobble {} for {} (active={}, pending={})",
                handle,
                request.song_id,
                self.active.len(),
                self.backlog.len()
            );
        }
        started
    }

    fn report_error(&mut self, message: &str, debug: Option<&Value>) {
        if let Some(value) = debug {
            tracing::debug!("scrobble error detail: {}", value);
        }
        if message.is_empty() {
            return;
        }
        tracing::error!("scrobble error: {}", message);

        self.errors.record(message, debug);
        if let Some(sink) = self.sink.as_mut() {
            sink.record(message, debug);
        }
    }
}

impl<T: Transport> Drop for ScrobbleQueue<T> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
