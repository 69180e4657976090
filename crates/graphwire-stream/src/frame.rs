//! Inbound frame decoding

use graphwire_core::{DomainEvent, unwrap_envelope};
use serde_json::Value;

use crate::error::StreamError;

/// A frame as handed over by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    /// Buffer pieces that together form one message.
    Fragments(Vec<Vec<u8>>),
}

impl Frame {
    /// Concatenate any binary pieces, then decode as UTF-8.
    pub fn into_text(self) -> Result<String, StreamError> {
        match self {
            Frame::Text(text) => Ok(text),
            Frame::Binary(bytes) => Ok(String::from_utf8(bytes)?),
            Frame::Fragments(parts) => Ok(String::from_utf8(parts.concat())?),
        }
    }
}

/// Frame text to event, through the same envelope handling as HTTP bodies.
pub fn decode_event(frame: Frame) -> Result<DomainEvent, StreamError> {
    let text = frame.into_text()?;
    let payload: Value = serde_json::from_str(&text)?;
    let payload = unwrap_envelope(payload).map_err(StreamError::Envelope)?;
    DomainEvent::from_value(&payload).ok_or(StreamError::MalformedEvent)
}
