//! Callbacks the stream reports through

use graphwire_core::DomainEvent;
use tokio::sync::mpsc;

use crate::error::StreamError;
use crate::state::ConnectionState;

/// Receives everything the stream produces.
///
/// Calls arrive in transport order from the driver task and must not block.
/// Follow-up async work (re-fetching, reloading lists) should be spawned; the
/// stream does not wait for it before delivering the next frame.
pub trait EventHandler: Send + Sync + 'static {
    fn on_event(&self, event: DomainEvent);

    fn on_status(&self, _state: ConnectionState) {}

    /// Dropped frames and transport failures. The stream keeps running.
    fn on_error(&self, _error: StreamError) {}
}

/// Everything a [`ChannelHandler`] forwards.
#[derive(Debug)]
pub enum StreamNotice {
    Event(DomainEvent),
    Status(ConnectionState),
    Error(StreamError),
}

/// Forwards every callback into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<StreamNotice>,
}

impl ChannelHandler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StreamNotice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, notice: StreamNotice) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.tx.send(notice);
    }
}

impl EventHandler for ChannelHandler {
    fn on_event(&self, event: DomainEvent) {
        self.send(StreamNotice::Event(event));
    }

    fn on_status(&self, state: ConnectionState) {
        self.send(StreamNotice::Status(state));
    }

    fn on_error(&self, error: StreamError) {
        self.send(StreamNotice::Error(error));
    }
}
