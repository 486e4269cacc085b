//! Transport abstraction consumed by the admission queue.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Param;

/// Opaque handle to one dispatched, not yet completed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestHandle(u64);

impl RequestHandle {
    /// Wrap a transport-assigned identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a finished operation handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Raw response body.
    Data(Vec<u8>),
    /// The server answered without a body.
    NoContent,
    /// The operation failed below the protocol level (network, TLS, HTTP status).
    Failed(String),
}

impl Reply {
    /// Response bytes, if any were received.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Data(bytes) if !bytes.is_empty() => Some(bytes),
            _ => None,
        }
    }
}

/// Completion event emitted exactly once per dispatched handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Handle returned by [`Transport::dispatch`].
    pub handle: RequestHandle,
    /// Outcome reported by the transport.
    pub reply: Reply,
}

/// Starts network operations on behalf of the queue.
///
/// Dispatch must not fail synchronously: a transport that cannot start the
/// operation still returns a handle and reports [`Reply::Failed`] as that
/// handle's completion, so the request stays counted until it is classified.
/// Completions must be delivered back to the queue's owner, never by calling
/// into the queue from inside `dispatch`.
pub trait Transport {
    /// Start `endpoint` with the given ordered parameters.
    fn dispatch(&mut self, endpoint: &str, params: Vec<Param>) -> RequestHandle;

    /// Abort a running operation. Unknown handles are ignored.
    fn abort(&mut self, handle: RequestHandle);

    /// Release bookkeeping for an operation whose completion was processed.
    fn release(&mut self, _handle: RequestHandle) {}
}
