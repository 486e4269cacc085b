//! Core admission queue, response classification, and transport seam.

pub mod classifier;
pub mod error;
pub mod error_log;
pub mod request;
pub mod scrobble_queue;
pub mod transport;

pub use classifier::{classify, extract_document, Outcome};
pub use error::{AppResult, ScrobbleError};
pub use error_log::{ErrorLog, ErrorSink};
pub use request::{encode_params, Param, PendingRequest, SCROBBLE_ENDPOINT};
pub use scrobble_queue::{
    QueueLimits, QueueStats, ScrobbleQueue, SubmitStatus, DEFAULT_MAX_CONCURRENT_REQUESTS,
};
pub use transport::{Completion, Reply, RequestHandle, Transport};
