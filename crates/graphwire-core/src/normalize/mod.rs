//! Tolerant response normalization.
//!
//! Each normalizer is a pure function from an arbitrary JSON value to one
//! canonical record. Optional fields that are missing or oddly shaped are
//! defaulted; only a missing identifying field on a single-resource fetch is
//! reported as [`Error::Shape`](crate::Error::Shape).
//!
//! Multi-field fallbacks are expressed as ordered `&[FieldPath]` / `&[&str]`
//! constants so the precedence is visible and testable on its own.

pub mod edges;
pub mod node;
pub mod stats;

use serde_json::Value;

use crate::coerce::{field, first_count, first_string, nested, to_bool, to_count, to_string};
use crate::model::{HealthStatus, NodeListPage, NodeSummary, TagSummary};

pub use edges::{normalize_edge, normalize_edges};
pub use node::{normalize_node_content, normalize_node_detail};
pub use stats::normalize_stats;

/// A location inside a payload, one hop or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    /// `{key: ..}`
    Flat(&'static str),
    /// `{section: {key: ..}}`
    Section(&'static str, &'static str),
}

impl FieldPath {
    pub fn locate(self, payload: &Value) -> Option<&Value> {
        match self {
            FieldPath::Flat(key) => field(payload, key),
            FieldPath::Section(section, key) => nested(payload, section, key),
        }
    }
}

/// First count found along `paths`.
pub fn first_count_at(payload: &Value, paths: &[FieldPath]) -> Option<u64> {
    paths.iter().find_map(|path| to_count(path.locate(payload)))
}

/// A list found in one of the accepted list shapes.
#[derive(Debug, Clone, Copy)]
pub struct ListShape<'a> {
    pub items: &'a [Value],
    /// Explicit `total` from a wrapper object, if any.
    pub total: Option<u64>,
}

/// Accept a bare array, or an object wrapping the array under one of
/// `wrapper_keys` (tried in order).
pub fn extract_list<'a>(value: Option<&'a Value>, wrapper_keys: &[&str]) -> Option<ListShape<'a>> {
    match value? {
        Value::Array(items) => Some(ListShape { items, total: None }),
        wrapper @ Value::Object(_) => {
            let items = wrapper_keys
                .iter()
                .find_map(|key| field(wrapper, key).and_then(Value::as_array))?;
            Some(ListShape {
                items,
                total: to_count(field(wrapper, "total")),
            })
        }
        _ => None,
    }
}

pub const NODE_LIST_WRAPPERS: &[&str] = &["items", "nodes"];
pub const TAG_LIST_WRAPPERS: &[&str] = &["items", "tags"];

/// Explicit flag, then a healthy-looking status word, then healthy.
pub fn normalize_health(payload: &Value) -> HealthStatus {
    let status = to_string(field(payload, "status"));
    let ok = to_bool(field(payload, "ok"))
        .or_else(|| status.as_deref().filter(|s| status_reads_healthy(s)).map(|_| true))
        // Absence of contrary evidence counts as healthy.
        .unwrap_or(true);

    HealthStatus {
        ok,
        status,
        version: to_string(field(payload, "version")),
        database_path: to_string(field(payload, "databasePath")),
        message: to_string(field(payload, "message")),
        uptime_seconds: crate::coerce::to_number(field(payload, "uptimeSeconds")),
    }
}

fn status_reads_healthy(status: &str) -> bool {
    status.eq_ignore_ascii_case("healthy") || status.eq_ignore_ascii_case("ok")
}

/// `None` when the item carries no usable id.
pub fn normalize_node_summary(raw: &Value) -> Option<NodeSummary> {
    let id = first_string(raw, &["id", "nodeId"])?;
    Some(NodeSummary {
        id,
        title: to_string(field(raw, "title")),
        tags: crate::coerce::to_tag_names(field(raw, "tags")),
        body_preview: first_string(raw, &["bodyPreview", "preview"]),
        body_length: to_count(field(raw, "bodyLength")),
        created_at: to_string(field(raw, "createdAt")),
        updated_at: to_string(field(raw, "updatedAt")),
    })
}

/// Array, `{items,total,limit,offset}`, or legacy `{nodes,..}`.
pub fn normalize_node_list(payload: &Value) -> NodeListPage {
    let Some(list) = extract_list(Some(payload), NODE_LIST_WRAPPERS) else {
        return NodeListPage::default();
    };
    let items: Vec<NodeSummary> = list.items.iter().filter_map(normalize_node_summary).collect();
    let dropped = list.items.len() - items.len();
    if dropped > 0 {
        tracing::debug!("Skipped {} node list entries without an id", dropped);
    }
    NodeListPage {
        total: list.total.unwrap_or(items.len() as u64),
        limit: first_count(payload, &["limit"]),
        offset: first_count(payload, &["offset"]),
        items,
    }
}

/// Bare strings or `{name|tag, count}` objects; nameless entries are skipped.
pub fn normalize_tag(raw: &Value) -> Option<TagSummary> {
    let name = to_string(Some(raw)).or_else(|| first_string(raw, &["name", "tag"]))?;
    Some(TagSummary {
        name,
        count: to_count(field(raw, "count")),
    })
}

/// Array, `{items}`, or legacy `{tags}`.
pub fn normalize_tag_list(payload: &Value) -> Vec<TagSummary> {
    extract_list(Some(payload), TAG_LIST_WRAPPERS)
        .map(|list| list.items.iter().filter_map(normalize_tag).collect())
        .unwrap_or_default()
}
