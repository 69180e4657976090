//! Live event stream for the graph service
//!
//! [`EventStreamClient`] keeps a push connection open, reconnecting after a
//! fixed delay whenever it drops, and hands decoded [`DomainEvent`]s to an
//! [`EventHandler`]. [`CacheSync`] is the handler that keeps a
//! `GraphClient`'s caches honest.
//!
//! [`DomainEvent`]: graphwire_core::DomainEvent

pub mod client;
pub mod error;
pub mod frame;
pub mod handler;
pub mod state;
pub mod sync;
pub mod transport;

pub use client::{EventStreamClient, Subscription};
pub use error::StreamError;
pub use frame::{Frame, decode_event};
pub use handler::{ChannelHandler, EventHandler, StreamNotice};
pub use state::{ConnectionState, StreamInput};
pub use sync::{CacheSync, Invalidation};
pub use transport::{Connection, Transport, WsTransport};
