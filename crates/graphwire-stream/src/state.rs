//! Connection state machine
//!
//! ```text
//!   Connecting ──Opened──► Connected
//!       │                     │
//!   Failed/Closed        Failed/Closed
//!       ▼                     │
//!   Disconnected ◄────────────┘
//!       │
//!   RetryElapsed ──► Connecting
//! ```
//!
//! There is no terminal state while subscribed; the driver stops only when
//! the subscription is cancelled.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

/// What happened to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamInput {
    /// Handshake completed.
    Opened,
    /// Connect attempt or socket failed.
    Failed,
    /// Peer closed or the stream ended.
    Closed,
    /// The reconnect timer fired.
    RetryElapsed,
}

impl ConnectionState {
    pub const INITIAL: ConnectionState = ConnectionState::Connecting;

    /// Inputs that make no sense in the current state leave it unchanged.
    pub fn next(self, input: StreamInput) -> ConnectionState {
        use ConnectionState::*;
        use StreamInput::*;

        match (self, input) {
            (Connecting, Opened) => Connected,
            (Connecting | Connected, Failed | Closed) => Disconnected,
            (Disconnected, RetryElapsed) => Connecting,
            (state, _) => state,
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::*;
    use StreamInput::*;

    #[test]
    fn test_happy_path_and_reconnect_cycle() {
        let mut state = ConnectionState::INITIAL;
        for (input, expected) in [
            (Opened, Connected),
            (Closed, Disconnected),
            (RetryElapsed, Connecting),
            (Failed, Disconnected),
            (RetryElapsed, Connecting),
            (Opened, Connected),
            (Failed, Disconnected),
        ] {
            state = state.next(input);
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn test_irrelevant_inputs_are_ignored() {
        assert_eq!(Connected.next(Opened), Connected);
        assert_eq!(Connected.next(RetryElapsed), Connected);
        assert_eq!(Connecting.next(RetryElapsed), Connecting);
        assert_eq!(Disconnected.next(Opened), Disconnected);
        assert_eq!(Disconnected.next(Closed), Disconnected);
    }
}
