//! HTTP client for the graph service
//!
//! [`GraphClient`] issues requests through a [`RequestExecutor`], shapes the
//! payloads with `graphwire-core` normalizers and keeps two independent
//! [`ResourceCache`]s (node content and node detail).

pub mod cache;
pub mod client;
pub mod config;
pub mod executor;
pub mod query;

pub use cache::ResourceCache;
pub use client::{GraphClient, Refresh};
pub use config::{ClientConfig, StreamConfig};
pub use executor::RequestExecutor;
pub use query::{ListQuery, NodeDetailOptions};
