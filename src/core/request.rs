//! Pending scrobble submissions and their wire parameters.

use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;

/// Remote operation every scrobble is sent to.
pub const SCROBBLE_ENDPOINT: &str = "scrobble";

/// One ordered key/value query parameter.
pub type Param = (String, String);

/// A scrobble submission that has not been dispatched yet.
///
/// Values are never mutated after creation; the queue moves them from the
/// backlog into the transport exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    /// Server-side identifier of the song being reported.
    pub song_id: String,
    /// `true` for a final scrobble, `false` for a "now playing" notice.
    pub submission: bool,
    /// Playback start time in milliseconds since the Unix epoch.
    pub time_ms: i64,
}

impl PendingRequest {
    /// Create a request for a song that started playing at `time_ms`.
    pub fn new(song_id: impl Into<String>, submission: bool, time_ms: i64) -> Self {
        Self {
            song_id: song_id.into(),
            submission,
            time_ms,
        }
    }

    /// Create a request stamped with the current wall-clock time.
    pub fn now(song_id: impl Into<String>, submission: bool) -> Self {
        Self::new(song_id, submission, now_ms())
    }
}

/// Encode a request into the ordered parameter list of a `scrobble` call.
pub fn encode_params(request: &PendingRequest) -> Vec<Param> {
    vec![
        ("id".to_string(), request.song_id.clone()),
        ("submission".to_string(), request.submission.to_string()),
        ("time".to_string(), request.time_ms.to_string()),
    ]
}
