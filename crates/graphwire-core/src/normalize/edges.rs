//! Edge record normalization

use serde_json::Value;

use crate::coerce::{field, first_number, first_string, to_record};
use crate::model::{Direction, EdgeRecord};

/// Field names for one endpoint of an edge, in lookup order.
#[derive(Debug, Clone, Copy)]
pub struct EdgeSide {
    /// Flat id fields.
    pub id_fields: &'static [&'static str],
    /// Nested endpoint objects, read for `id` after the flat fields.
    pub nested: &'static [&'static str],
    /// Flat title fields, tried before the nested object's `title`/`name`.
    pub title_fields: &'static [&'static str],
}

pub const SOURCE_SIDE: EdgeSide = EdgeSide {
    id_fields: &["sourceId", "fromId", "fromNodeId"],
    nested: &["source", "from"],
    title_fields: &["fromTitle", "sourceTitle"],
};

pub const TARGET_SIDE: EdgeSide = EdgeSide {
    id_fields: &["targetId", "toId", "toNodeId"],
    nested: &["target", "to"],
    title_fields: &["toTitle", "targetTitle"],
};

pub const SCORE_PRECEDENCE: &[&str] = &["score", "weight", "similarity"];

const NESTED_TITLE_FIELDS: &[&str] = &["title", "name"];

impl EdgeSide {
    pub fn id(&self, raw: &Value) -> Option<String> {
        first_string(raw, self.id_fields)
            .or_else(|| self.nested_objects(raw).find_map(|obj| first_string(obj, &["id"])))
    }

    pub fn title(&self, raw: &Value) -> Option<String> {
        first_string(raw, self.title_fields).or_else(|| {
            self.nested_objects(raw)
                .find_map(|obj| first_string(obj, NESTED_TITLE_FIELDS))
        })
    }

    fn nested_objects<'a>(&self, raw: &'a Value) -> impl Iterator<Item = &'a Value> + use<'a> {
        let nested = self.nested;
        nested
            .iter()
            .filter_map(move |key| field(raw, key).filter(|v| to_record(Some(v)).is_some()))
    }
}

/// Normalize one edge as seen from `node_id`.
///
/// The direction is always recomputed; any server-provided direction is ignored.
pub fn normalize_edge(raw: &Value, node_id: &str) -> EdgeRecord {
    let source_id = SOURCE_SIDE.id(raw);
    let target_id = TARGET_SIDE.id(raw);
    let direction = Direction::relative_to(node_id, source_id.as_deref(), target_id.as_deref());

    EdgeRecord {
        id: first_string(raw, &["id", "edgeId"]),
        direction,
        score: first_number(raw, SCORE_PRECEDENCE),
        status: first_string(raw, &["status"]),
        label: first_string(raw, &["label"]),
        description: first_string(raw, &["description"]),
        to_title: TARGET_SIDE.title(raw),
        from_title: SOURCE_SIDE.title(raw),
        source_id,
        target_id,
    }
}

/// Normalize a list of raw edges, skipping entries that are not objects.
pub fn normalize_edges(items: &[Value], node_id: &str) -> Vec<EdgeRecord> {
    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| normalize_edge(item, node_id))
        .collect()
}
