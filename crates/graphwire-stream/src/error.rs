//! Event-stream failures. These are reported to the handler, never returned.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("failed to connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("socket error: {0}")]
    Socket(String),

    #[error("connection closed by peer")]
    Closed,

    #[error("frame is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("frame is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame is not an event: missing string `type`")]
    MalformedEvent,

    #[error("frame envelope rejected: {0}")]
    Envelope(#[source] graphwire_core::Error),
}

impl StreamError {
    /// Connection-level failures, as opposed to a single bad frame.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            StreamError::Connect { .. } | StreamError::Socket(_) | StreamError::Closed
        )
    }
}
