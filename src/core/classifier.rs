//! Response classification for completed scrobble requests.
//!
//! A scrobble reply carries no data on success: the server either sends an
//! empty body or a document without an `error` key. Only errors can be
//! detected, so anything that is not a recognisable error document counts as
//! success.

use serde_json::{Map, Value};

/// Envelope key wrapping every Subsonic JSON reply.
const ENVELOPE_KEY: &str = "subsonic-response";

/// Result of classifying one completed request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No error was reported.
    Success,
    /// The server returned a well-formed error object.
    ProtocolError {
        /// Numeric error code.
        code: i64,
        /// Server-supplied message.
        message: String,
    },
    /// The reply contains an `error` entry of an unexpected shape.
    MalformedError {
        /// Diagnostic message for the error log.
        message: String,
        /// Partially parsed document, kept for debug logging only.
        debug: Value,
    },
}

impl Outcome {
    /// Whether the request counts as successful.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Text to append to the error log, if this outcome is an error.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success => None,
            Self::ProtocolError { code, message } => Some(format!("{message} ({code})")),
            Self::MalformedError { message, .. } => Some(message.clone()),
        }
    }

    /// Diagnostic payload attached to a malformed reply.
    pub const fn debug_value(&self) -> Option<&Value> {
        match self {
            Self::MalformedError { debug, .. } => Some(debug),
            _ => None,
        }
    }
}

/// Parse a reply body into a JSON object.
///
/// Returns `None` for anything that is not a non-empty JSON object. A
/// `subsonic-response` envelope is unwrapped when present.
pub fn extract_document(data: &[u8]) -> Option<Map<String, Value>> {
    let mut object = match serde_json::from_slice::<Value>(data) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return None,
        Err(e) => {
            tracing::debug!("reply is not a json document: {}", e);
            return None;
        }
    };

    if let Some(Value::Object(inner)) = object.remove(ENVELOPE_KEY) {
        object = inner;
    }

    if object.is_empty() {
        None
    } else {
        Some(object)
    }
}

/// Classify a reply payload. `None` means the transport delivered no bytes.
pub fn classify(payload: Option<&[u8]>) -> Outcome {
    let Some(data) = payload.filter(|d| !d.is_empty()) else {
        return Outcome::Success;
    };
    let Some(document) = extract_document(data) else {
        return Outcome::Success;
    };
    let Some(error) = document.get("error") else {
        return Outcome::Success;
    };

    let Value::Object(fields) = error else {
        return Outcome::MalformedError {
            message: "Scrobble reply error field is not an object.".to_string(),
            debug: Value::Object(document.clone()),
        };
    };

    let code = fields.get("code").and_then(Value::as_i64);
    let message = fields.get("message").and_then(Value::as_str);
    match (code, message) {
        (Some(code), Some(message)) => Outcome::ProtocolError {
            code,
            message: message.to_string(),
        },
        _ => Outcome::MalformedError {
            message: "Scrobble reply error object is missing code or message.".to_string(),
            debug: error.clone(),
        },
    }
}
