//! Reconnecting event-stream client

use std::sync::Arc;
use std::time::Duration;

use graphwire_client::{ClientConfig, StreamConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::StreamError;
use crate::frame::{Frame, decode_event};
use crate::handler::EventHandler;
use crate::state::{ConnectionState, StreamInput};
use crate::transport::{Connection, Transport, WsTransport};

/// Upper bound on the close handshake during unsubscribe.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Maintains one push-event connection per [`Subscription`].
#[derive(Clone)]
pub struct EventStreamClient {
    url: String,
    protocols: Vec<String>,
    retry_delay: Duration,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for EventStreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStreamClient")
            .field("url", &self.url)
            .field("protocols", &self.protocols)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl EventStreamClient {
    /// WebSocket client for the service described by `client`.
    pub fn new(client: &ClientConfig, stream: &StreamConfig) -> graphwire_core::Result<Self> {
        let url = client.ws_url(stream)?;
        Ok(Self::with_transport(url.as_str(), stream, Arc::new(WsTransport)))
    }

    pub fn with_transport(
        url: impl Into<String>,
        stream: &StreamConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            url: url.into(),
            protocols: stream.protocols.clone(),
            retry_delay: stream.retry_delay,
            transport,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Start the connection loop on the current tokio runtime.
    ///
    /// The loop reconnects forever until the returned [`Subscription`] is
    /// unsubscribed or dropped.
    pub fn subscribe(&self, handler: Arc<dyn EventHandler>) -> Subscription {
        let token = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(ConnectionState::INITIAL);

        let driver = Driver {
            url: self.url.clone(),
            protocols: self.protocols.clone(),
            retry_delay: self.retry_delay,
            transport: Arc::clone(&self.transport),
            handler,
            token: token.clone(),
            state: ConnectionState::INITIAL,
            state_tx,
        };
        let task = tokio::spawn(driver.run());

        Subscription {
            token,
            state: state_rx,
            task: Some(task),
        }
    }
}

/// Handle to a running event stream. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
    state: watch::Receiver<ConnectionState>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stop for good: cancels a pending reconnect timer and closes the socket
    /// (gracefully when open, by abandoning the handshake otherwise). Caches
    /// and in-flight HTTP calls are not touched.
    pub fn unsubscribe(&self) {
        if !self.token.is_cancelled() {
            info!("Unsubscribing from event stream");
            self.token.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Observe state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Unsubscribe and wait for the driver to finish.
    pub async fn shutdown(mut self) {
        self.unsubscribe();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Event stream task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Why the frame pump stopped.
enum PumpEnd {
    Unsubscribed,
    Closed,
    Failed(StreamError),
}

struct Driver {
    url: String,
    protocols: Vec<String>,
    retry_delay: Duration,
    transport: Arc<dyn Transport>,
    handler: Arc<dyn EventHandler>,
    token: CancellationToken,
    state: ConnectionState,
    state_tx: watch::Sender<ConnectionState>,
}

impl Driver {
    async fn run(mut self) {
        self.handler.on_status(self.state);

        loop {
            debug!("Connecting to event stream at {}", self.url);
            let attempt = self.transport.connect(&self.url, &self.protocols);
            let outcome = tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                outcome = attempt => outcome,
            };

            match outcome {
                Ok(mut connection) => {
                    info!("Event stream connected to {}", self.url);
                    self.apply(StreamInput::Opened);

                    match self.pump(connection.as_mut()).await {
                        PumpEnd::Unsubscribed => {
                            if tokio::time::timeout(CLOSE_GRACE, connection.close()).await.is_err() {
                                debug!("Close handshake did not finish in {:?}", CLOSE_GRACE);
                            }
                            break;
                        }
                        PumpEnd::Closed => {
                            warn!("Event stream closed by peer");
                            self.handler.on_error(StreamError::Closed);
                            self.apply(StreamInput::Closed);
                        }
                        PumpEnd::Failed(e) => {
                            warn!("Event stream failed: {}", e);
                            self.handler.on_error(e);
                            self.apply(StreamInput::Failed);
                        }
                    }
                }
                Err(e) => {
                    warn!("Event stream connect failed: {}", e);
                    self.handler.on_error(e);
                    self.apply(StreamInput::Failed);
                }
            }

            debug!("Reconnecting in {:?}", self.retry_delay);
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                _ = tokio::time::sleep(self.retry_delay) => self.apply(StreamInput::RetryElapsed),
            }
        }

        if self.state != ConnectionState::Disconnected {
            self.set_state(ConnectionState::Disconnected);
        }
        info!("Event stream stopped");
    }

    /// Deliver frames until the connection ends or we are cancelled.
    async fn pump(&self, connection: &mut dyn Connection) -> PumpEnd {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.token.cancelled() => return PumpEnd::Unsubscribed,
                next = connection.next_frame() => next,
            };
            match next {
                Some(Ok(frame)) => self.dispatch(frame),
                Some(Err(e)) => return PumpEnd::Failed(e),
                None => return PumpEnd::Closed,
            }
        }
    }

    /// Bad frames are reported and skipped; they never end the stream.
    fn dispatch(&self, frame: Frame) {
        match decode_event(frame) {
            Ok(event) => {
                debug!("Event stream delivered {}", event.kind());
                self.handler.on_event(event);
            }
            Err(e) => {
                warn!("Dropping event frame: {}", e);
                self.handler.on_error(e);
            }
        }
    }

    fn apply(&mut self, input: StreamInput) {
        let next = self.state.next(input);
        if next != self.state {
            self.set_state(next);
        }
    }

    fn set_state(&mut self, state: ConnectionState) {
        debug!("Event stream {} -> {}", self.state, state);
        self.state = state;
        self.state_tx.send_replace(state);
        self.handler.on_status(state);
    }
}
