//! Single-node normalization: content and detail

use serde_json::Value;

use super::edges::normalize_edges;
use super::{FieldPath, extract_list};
use crate::coerce::{field, first_count, first_string, to_count, to_string, to_tag_names};
use crate::error::{Error, Result};
use crate::model::{EdgeRecord, NodeContent, NodeDetail};

use FieldPath::{Flat, Section};

/// Where accepted edges may live, first non-empty wins.
pub const EDGE_LIST_PRECEDENCE: &[FieldPath] = &[Flat("edges"), Section("edges", "accepted")];

/// Where suggestions may live, first non-empty wins.
pub const SUGGESTION_LIST_PRECEDENCE: &[FieldPath] = &[
    Flat("suggestions"),
    Section("edges", "suggested"),
    Flat("suggestedEdges"),
];

/// Wrapper keys accepted around an edge array.
pub const EDGE_LIST_WRAPPERS: &[&str] = &["items", "edges"];

/// Node fields may sit under a `node` object instead of the top level.
fn node_scope(payload: &Value) -> &Value {
    field(payload, "node").filter(|v| v.is_object()).unwrap_or(payload)
}

/// Payload id, else the id the caller asked for.
fn resolve_id(scope: &Value, requested_id: &str) -> Result<String> {
    first_string(scope, &["id", "nodeId"])
        .or_else(|| (!requested_id.is_empty()).then(|| requested_id.to_string()))
        .ok_or(Error::Shape("id"))
}

/// Edges found along `precedence`, normalized relative to `node_id`.
///
/// Returns the records and the total: the wrapper's `total`, then the flat
/// `total_key`, then the number of extracted items. An empty wrapper still
/// contributes its `total` when no list has items.
fn resolve_edge_list(
    scopes: &[&Value],
    precedence: &[FieldPath],
    total_key: &str,
    node_id: &str,
) -> (Vec<EdgeRecord>, u64) {
    let explicit_total = scopes.iter().find_map(|scope| first_count(scope, &[total_key]));
    let mut empty_wrapper_total = None;

    for scope in scopes {
        for path in precedence {
            let Some(list) = extract_list(path.locate(scope), EDGE_LIST_WRAPPERS) else {
                continue;
            };
            if list.items.is_empty() {
                empty_wrapper_total = empty_wrapper_total.or(list.total);
                continue;
            }
            let records = normalize_edges(list.items, node_id);
            let total = list
                .total
                .or(explicit_total)
                .unwrap_or(records.len() as u64);
            return (records, total);
        }
    }
    (Vec::new(), empty_wrapper_total.or(explicit_total).unwrap_or(0))
}

/// Normalize `GET nodes/{id}`.
///
/// Edge directions are computed relative to `requested_id` (or the payload id
/// when no id was requested).
pub fn normalize_node_detail(payload: &Value, requested_id: &str) -> Result<NodeDetail> {
    let node = node_scope(payload);
    let id = resolve_id(node, requested_id)?;
    let perspective = if requested_id.is_empty() { id.as_str() } else { requested_id };

    let scopes: Vec<&Value> = if std::ptr::eq(node, payload) {
        vec![payload]
    } else {
        vec![payload, node]
    };
    let (edges, edges_total) =
        resolve_edge_list(&scopes, EDGE_LIST_PRECEDENCE, "edgesTotal", perspective);
    let (suggestions, suggestions_total) =
        resolve_edge_list(&scopes, SUGGESTION_LIST_PRECEDENCE, "suggestionsTotal", perspective);

    Ok(NodeDetail {
        title: to_string(field(node, "title")),
        body: to_string(field(node, "body")),
        tags: to_tag_names(field(node, "tags")),
        body_length: to_count(field(node, "bodyLength")),
        id,
        edges,
        edges_total,
        suggestions,
        suggestions_total,
    })
}

/// Normalize `GET nodes/{id}/content`.
pub fn normalize_node_content(payload: &Value, requested_id: &str) -> Result<NodeContent> {
    let node = node_scope(payload);
    let id = resolve_id(node, requested_id)?;

    Ok(NodeContent {
        id,
        title: to_string(field(node, "title")),
        body: first_string(node, &["body", "content"]).unwrap_or_default(),
        tags: to_tag_names(field(node, "tags")),
        body_length: to_count(field(node, "bodyLength")),
        updated_at: to_string(field(node, "updatedAt")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;
    use serde_json::json;

    #[test]
    fn test_nested_accepted_and_suggested_sections() {
        let detail = normalize_node_detail(
            &json!({
                "id": "n1",
                "edges": {
                    "accepted": [
                        {"sourceId": "n1", "targetId": "n2"},
                        {"sourceId": "n3", "targetId": "n1"}
                    ],
                    "suggested": [{"sourceId": "n1", "targetId": "n4", "score": 0.8}]
                }
            }),
            "n1",
        )
        .unwrap();
        assert_eq!(detail.edges.len(), 2);
        assert_eq!(detail.suggestions.len(), 1);
        assert_eq!(detail.edges_total, 2);
        assert_eq!(detail.suggestions_total, 1);
        assert_eq!(detail.edges[0].direction, Direction::Out);
        assert_eq!(detail.edges[1].direction, Direction::In);
    }

    #[test]
    fn test_wrapped_lists_and_explicit_totals() {
        let detail = normalize_node_detail(
            &json!({
                "id": "n1",
                "edges": {"items": [{"sourceId": "n1", "targetId": "n1"}], "total": 30},
                "suggestions": {"edges": [{"fromId": "n9", "toId": "n1"}]},
                "suggestionsTotal": 12
            }),
            "n1",
        )
        .unwrap();
        assert_eq!(detail.edges_total, 30);
        assert_eq!(detail.edges[0].direction, Direction::Bidirectional);
        assert_eq!(detail.suggestions_total, 12);
        assert_eq!(detail.suggestions[0].direction, Direction::In);
    }

    #[test]
    fn test_empty_page_keeps_wrapper_total() {
        let detail = normalize_node_detail(
            &json!({
                "id": "n1",
                "edges": {"items": [], "total": 30},
                "suggestions": {"items": [], "total": 7},
                "suggestionsTotal": 2
            }),
            "n1",
        )
        .unwrap();
        assert!(detail.edges.is_empty());
        assert_eq!(detail.edges_total, 30);
        assert!(detail.suggestions.is_empty());
        assert_eq!(detail.suggestions_total, 7);

        let flat_only = normalize_node_detail(&json!({"edges": [], "edgesTotal": 4}), "n1").unwrap();
        assert_eq!(flat_only.edges_total, 4);
    }

    #[test]
    fn test_legacy_suggested_edges_is_last() {
        let detail = normalize_node_detail(
            &json!({
                "edges": [],
                "suggestions": [],
                "suggestedEdges": [{"sourceId": "x", "targetId": "y"}]
            }),
            "n1",
        )
        .unwrap();
        assert!(detail.edges.is_empty());
        assert_eq!(detail.edges_total, 0);
        assert_eq!(detail.suggestions.len(), 1);
        assert_eq!(detail.suggestions[0].direction, Direction::Undefined);
    }

    #[test]
    fn test_top_level_edges_beat_sections() {
        let detail = normalize_node_detail(
            &json!({
                "edges": [{"sourceId": "n1", "targetId": "n2"}],
                "suggestions": [{"sourceId": "n1", "targetId": "n3"}, {"sourceId": "n1", "targetId": "n4"}]
            }),
            "n1",
        )
        .unwrap();
        assert_eq!(detail.edges.len(), 1);
        assert_eq!(detail.suggestions.len(), 2);
    }

    #[test]
    fn test_id_falls_back_to_request() {
        let detail = normalize_node_detail(&json!({"title": "Untitled"}), "n7").unwrap();
        assert_eq!(detail.id, "n7");
        assert_eq!(detail.title.as_deref(), Some("Untitled"));
    }

    #[test]
    fn test_missing_id_everywhere_is_shape_error() {
        let err = normalize_node_detail(&json!({"title": "x"}), "").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Shape);

        let err = normalize_node_content(&json!(null), "").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Shape);
    }

    #[test]
    fn test_node_wrapper() {
        let detail = normalize_node_detail(
            &json!({
                "node": {"id": "n1", "title": "Wrapped", "tags": ["a", "a", "b"], "body": "text"},
                "edges": [{"source": {"id": "n1"}, "target": {"id": "n2", "title": "Other"}}]
            }),
            "n1",
        )
        .unwrap();
        assert_eq!(detail.title.as_deref(), Some("Wrapped"));
        assert_eq!(detail.tags, vec!["a", "b"]);
        assert_eq!(detail.edges[0].to_title.as_deref(), Some("Other"));
    }

    #[test]
    fn test_content_body_fallbacks() {
        let content = normalize_node_content(&json!({"content": "# Notes"}), "n2").unwrap();
        assert_eq!(content.id, "n2");
        assert_eq!(content.body, "# Notes");

        let empty = normalize_node_content(&json!({"id": 5}), "n2").unwrap();
        assert_eq!(empty.id, "5");
        assert_eq!(empty.body, "");
    }
}
