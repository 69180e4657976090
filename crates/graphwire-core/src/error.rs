//! Error taxonomy for graph service calls

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that reach the caller of a request method.
///
/// Optional-field ambiguity never ends up here; it is defaulted during
/// normalization.
#[derive(Error, Debug)]
pub enum Error {
    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection refused, reset, DNS failure and the like.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("malformed JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The envelope declared `success: false`.
    #[error("{0}")]
    Protocol(String),

    /// A required identifying field was absent.
    #[error("response is missing required field `{0}`")]
    Shape(&'static str),
}

/// Coarse classification callers branch on, e.g. to retry timeouts only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Timeout,
    Protocol,
    Shape,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Status { .. }
            | Error::Transport(_)
            | Error::InvalidUrl(_)
            | Error::Decode(_) => ErrorKind::Transport,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::Protocol(_) => ErrorKind::Protocol,
            Error::Shape(_) => ErrorKind::Shape,
        }
    }

    /// HTTP status code, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}
