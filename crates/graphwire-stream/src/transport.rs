//! Transport seam between the reconnect driver and the socket.
//!
//! The driver only sees [`Transport`] and [`Connection`], so tests can script
//! opens, frames, errors and closes without a real socket.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use crate::error::StreamError;
use crate::frame::Frame;

/// Opens connections. Dropping the returned future aborts the attempt.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn connect(&self, url: &str, protocols: &[String]) -> Result<Box<dyn Connection>, StreamError>;
}

/// One open, receive-only connection.
#[async_trait]
pub trait Connection: Send {
    /// `None` once the peer has closed the connection.
    async fn next_frame(&mut self) -> Option<Result<Frame, StreamError>>;

    /// Graceful close handshake.
    async fn close(&mut self);
}

/// WebSocket transport over `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self, url: &str, protocols: &[String]) -> Result<Box<dyn Connection>, StreamError> {
        let connect_error = |message: String| StreamError::Connect {
            url: url.to_string(),
            message,
        };

        let mut request = url.into_client_request().map_err(|e| connect_error(e.to_string()))?;
        if !protocols.is_empty() {
            let offered = HeaderValue::from_str(&protocols.join(", "))
                .map_err(|e| connect_error(e.to_string()))?;
            request.headers_mut().insert("Sec-WebSocket-Protocol", offered);
        }

        let (socket, response) = connect_async(request)
            .await
            .map_err(|e| connect_error(e.to_string()))?;
        debug!("WebSocket handshake with {} returned {}", url, response.status());

        Ok(Box::new(WsConnection { socket }))
    }
}

struct WsConnection {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connection for WsConnection {
    async fn next_frame(&mut self) -> Option<Result<Frame, StreamError>> {
        loop {
            let message = match self.socket.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(StreamError::Socket(e.to_string()))),
            };
            match message {
                Message::Text(text) => return Some(Ok(Frame::Text(text))),
                Message::Binary(bytes) => return Some(Ok(Frame::Binary(bytes))),
                Message::Close(frame) => {
                    debug!("Server closed the event stream: {:?}", frame);
                    return None;
                }
                // Pings are answered by tungstenite itself.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.socket.close(None).await {
            debug!("Error while closing event stream: {}", e);
        }
    }
}
