//! Push events delivered over the live connection.
//!
//! Events are invalidation hints. Consumers evict and re-fetch; they never
//! patch local state from event payloads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce::{field, first_string, to_record};
use crate::normalize::edges::{SOURCE_SIDE, TARGET_SIDE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEvent {
    pub node_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEvent {
    pub edge_id: Option<String>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
}

impl EdgeEvent {
    /// Endpoints that are known, source first.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.source_id.iter().chain(self.target_id.iter()).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRenamedEvent {
    pub old_name: Option<String>,
    pub new_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum DomainEvent {
    #[serde(rename = "node:created")]
    NodeCreated(NodeEvent),
    #[serde(rename = "node:updated")]
    NodeUpdated(NodeEvent),
    #[serde(rename = "node:deleted")]
    NodeDeleted(NodeEvent),
    #[serde(rename = "edge:created")]
    EdgeCreated(EdgeEvent),
    #[serde(rename = "edge:accepted")]
    EdgeAccepted(EdgeEvent),
    #[serde(rename = "edge:rejected")]
    EdgeRejected(EdgeEvent),
    #[serde(rename = "edge:deleted")]
    EdgeDeleted(EdgeEvent),
    #[serde(rename = "tag:renamed")]
    TagRenamed(TagRenamedEvent),
    /// Any other `type`, with every field of the frame kept. Serializes back
    /// to those fields, so the wire `type` survives.
    #[serde(untagged)]
    Other {
        #[serde(skip_serializing)]
        kind: String,
        #[serde(flatten)]
        fields: Map<String, Value>,
    },
}

impl DomainEvent {
    /// Decode an already-unwrapped frame. `None` unless it is an object with
    /// a string `type`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = to_record(Some(value))?;
        let kind = record.get("type")?.as_str()?;

        let event = match kind {
            "node:created" => DomainEvent::NodeCreated(node_event(value)),
            "node:updated" => DomainEvent::NodeUpdated(node_event(value)),
            "node:deleted" => DomainEvent::NodeDeleted(node_event(value)),
            "edge:created" => DomainEvent::EdgeCreated(edge_event(value)),
            "edge:accepted" => DomainEvent::EdgeAccepted(edge_event(value)),
            "edge:rejected" => DomainEvent::EdgeRejected(edge_event(value)),
            "edge:deleted" => DomainEvent::EdgeDeleted(edge_event(value)),
            "tag:renamed" => DomainEvent::TagRenamed(TagRenamedEvent {
                old_name: first_string(value, &["oldName", "from"]),
                new_name: first_string(value, &["newName", "to"]),
            }),
            other => DomainEvent::Other {
                kind: other.to_string(),
                fields: record.clone(),
            },
        };
        Some(event)
    }

    /// The wire `type` string.
    pub fn kind(&self) -> &str {
        match self {
            DomainEvent::NodeCreated(_) => "node:created",
            DomainEvent::NodeUpdated(_) => "node:updated",
            DomainEvent::NodeDeleted(_) => "node:deleted",
            DomainEvent::EdgeCreated(_) => "edge:created",
            DomainEvent::EdgeAccepted(_) => "edge:accepted",
            DomainEvent::EdgeRejected(_) => "edge:rejected",
            DomainEvent::EdgeDeleted(_) => "edge:deleted",
            DomainEvent::TagRenamed(_) => "tag:renamed",
            DomainEvent::Other { kind, .. } => kind,
        }
    }
}

/// `nodeId`, `id`, or a nested `node.id`.
fn node_event(value: &Value) -> NodeEvent {
    let node_id = first_string(value, &["nodeId", "id"])
        .or_else(|| field(value, "node").and_then(|node| first_string(node, &["id"])));
    NodeEvent { node_id }
}

/// Endpoints resolve with the same field names as edge records.
fn edge_event(value: &Value) -> EdgeEvent {
    let edge = field(value, "edge").filter(|v| v.is_object()).unwrap_or(value);
    EdgeEvent {
        edge_id: first_string(value, &["edgeId"]).or_else(|| first_string(edge, &["id"])),
        source_id: SOURCE_SIDE.id(edge),
        target_id: TARGET_SIDE.id(edge),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_deleted() {
        let event = DomainEvent::from_value(&json!({"type": "node:deleted", "nodeId": "n5"})).unwrap();
        assert_eq!(
            event,
            DomainEvent::NodeDeleted(NodeEvent {
                node_id: Some("n5".to_string())
            })
        );
        assert_eq!(event.kind(), "node:deleted");
    }

    #[test]
    fn test_edge_event_nested_edge() {
        let event = DomainEvent::from_value(&json!({
            "type": "edge:accepted",
            "edge": {"id": "e1", "fromId": "a", "target": {"id": "b"}}
        }))
        .unwrap();
        let DomainEvent::EdgeAccepted(edge) = event else {
            panic!("expected edge:accepted");
        };
        assert_eq!(edge.edge_id.as_deref(), Some("e1"));
        assert_eq!(edge.endpoints().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_kind_keeps_fields() {
        let event = DomainEvent::from_value(&json!({"type": "graph:reindexed", "took": 12})).unwrap();
        match event {
            DomainEvent::Other { kind, fields } => {
                assert_eq!(kind, "graph:reindexed");
                assert_eq!(fields.get("took"), Some(&json!(12)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_serialized_events_keep_wire_type() {
        let frame = json!({"type": "graph:reindexed", "took": 12});
        let unknown = DomainEvent::from_value(&frame).unwrap();
        assert_eq!(serde_json::to_value(&unknown).unwrap(), frame);

        let deleted = DomainEvent::from_value(&json!({"type": "node:deleted", "nodeId": "n5"})).unwrap();
        assert_eq!(
            serde_json::to_value(&deleted).unwrap(),
            json!({"type": "node:deleted", "payload": {"nodeId": "n5"}})
        );
    }

    #[test]
    fn test_frames_without_string_type_are_rejected() {
        assert!(DomainEvent::from_value(&json!({"nodeId": "n1"})).is_none());
        assert!(DomainEvent::from_value(&json!({"type": 4})).is_none());
        assert!(DomainEvent::from_value(&json!(["node:created"])).is_none());
        assert!(DomainEvent::from_value(&json!("node:created")).is_none());
    }

    #[test]
    fn test_tag_renamed() {
        let event = DomainEvent::from_value(&json!({"type": "tag:renamed", "from": "old", "to": "new"})).unwrap();
        assert_eq!(
            event,
            DomainEvent::TagRenamed(TagRenamedEvent {
                old_name: Some("old".into()),
                new_name: Some("new".into())
            })
        );
    }
}
