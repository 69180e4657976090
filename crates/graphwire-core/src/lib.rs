//! Graphwire Core: canonical graph records, tolerant response normalization,
//! envelope handling and push-event decoding.
//!
//! Nothing in this crate performs I/O. Every function takes an already-parsed
//! `serde_json::Value` and reduces it to one of the record types in [`model`].

pub mod coerce;
pub mod envelope;
pub mod error;
pub mod event;
pub mod model;
pub mod normalize;

#[cfg(test)]
pub mod tests;

pub use envelope::unwrap_envelope;
pub use error::{Error, ErrorKind, Result};
pub use event::{DomainEvent, EdgeEvent, NodeEvent, TagRenamedEvent};
pub use model::{
    Direction, EdgeRecord, GraphStats, HealthStatus, HighDegreeNode, NodeContent, NodeDetail,
    NodeListPage, NodeSummary, RecentNode, SuggestionSummary, TagSummary,
};
pub use normalize::{
    normalize_edge, normalize_health, normalize_node_content, normalize_node_detail,
    normalize_node_list, normalize_stats, normalize_tag_list,
};
