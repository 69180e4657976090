//! Stats normalization
//!
//! The server has shipped two shapes for `GET stats`: a flat legacy one
//! (`{nodes: 10, edges: 20}`) and a nested one where every count lives in a
//! section (`{nodes: {total: 524}, edges: {accepted: 1200, total: 1242}}`).
//! Walking the precedence lists below handles both without a version flag.

use serde_json::Value;

use super::edges::{SCORE_PRECEDENCE, SOURCE_SIDE, TARGET_SIDE};
use super::{FieldPath, first_count_at, normalize_tag};
use crate::coerce::{first_count, first_number, first_string};
use crate::model::{GraphStats, HighDegreeNode, RecentNode, SuggestionSummary, TagSummary};

use FieldPath::{Flat, Section};

pub const NODE_COUNT_PRECEDENCE: &[FieldPath] = &[
    Flat("nodes"),
    Section("counts", "nodes"),
    Section("nodes", "total"),
    Section("nodes", "accepted"),
];

pub const EDGE_COUNT_PRECEDENCE: &[FieldPath] = &[
    Flat("edges"),
    Section("counts", "edges"),
    Section("edges", "total"),
    Section("edges", "accepted"),
];

pub const TAG_COUNT_PRECEDENCE: &[FieldPath] = &[
    Flat("tags"),
    Section("counts", "tags"),
    Section("tags", "total"),
    Section("tags", "accepted"),
];

pub const SUGGESTED_EDGE_COUNT_PRECEDENCE: &[FieldPath] = &[
    Flat("suggestedEdges"),
    Section("counts", "suggestedEdges"),
    Section("suggestedEdges", "total"),
    Section("suggestedEdges", "suggested"),
    Section("edges", "suggested"),
];

pub const RECENT_NODES_PRECEDENCE: &[FieldPath] = &[Flat("recentNodes"), Section("nodes", "recent")];
pub const TOP_TAGS_PRECEDENCE: &[FieldPath] = &[Flat("topTags"), Section("tags", "top")];
pub const TOP_SUGGESTIONS_PRECEDENCE: &[FieldPath] = &[
    Flat("topSuggestions"),
    Section("suggestions", "top"),
    Section("edges", "topSuggestions"),
];
pub const HIGH_DEGREE_PRECEDENCE: &[FieldPath] =
    &[Flat("highDegreeNodes"), Section("nodes", "highDegree")];

pub const RECENT_COUNT_PRECEDENCE: &[FieldPath] =
    &[Flat("recentCount"), Section("nodes", "recentCount")];
pub const HIGH_SCORE_COUNT_PRECEDENCE: &[FieldPath] = &[
    Flat("highScoreSuggestionCount"),
    Section("suggestions", "highScoreCount"),
    Section("edges", "highScoreSuggestions"),
];

/// First array found along `paths`.
fn first_list_at<'a>(payload: &'a Value, paths: &[FieldPath]) -> &'a [Value] {
    paths
        .iter()
        .find_map(|path| path.locate(payload).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn recent_node(raw: &Value) -> Option<RecentNode> {
    Some(RecentNode {
        id: first_string(raw, &["id", "nodeId"])?,
        title: first_string(raw, &["title"]),
        created_at: first_string(raw, &["createdAt"]),
    })
}

fn top_suggestion(raw: &Value) -> Option<SuggestionSummary> {
    raw.as_object()?;
    Some(SuggestionSummary {
        reference: first_string(raw, &["ref", "id"]),
        source_id: SOURCE_SIDE.id(raw),
        target_id: TARGET_SIDE.id(raw),
        score: first_number(raw, SCORE_PRECEDENCE),
    })
}

fn high_degree_node(raw: &Value) -> Option<HighDegreeNode> {
    Some(HighDegreeNode {
        id: first_string(raw, &["id", "nodeId"])?,
        title: first_string(raw, &["title"]),
        edge_count: first_count(raw, &["edgeCount", "degree"]),
    })
}

pub fn normalize_stats(payload: &Value) -> GraphStats {
    let top_tags: Vec<TagSummary> = first_list_at(payload, TOP_TAGS_PRECEDENCE)
        .iter()
        .filter_map(normalize_tag)
        .collect();

    GraphStats {
        nodes: first_count_at(payload, NODE_COUNT_PRECEDENCE),
        edges: first_count_at(payload, EDGE_COUNT_PRECEDENCE),
        suggested_edges: first_count_at(payload, SUGGESTED_EDGE_COUNT_PRECEDENCE),
        tags: first_count_at(payload, TAG_COUNT_PRECEDENCE),
        recent_nodes: first_list_at(payload, RECENT_NODES_PRECEDENCE)
            .iter()
            .filter_map(recent_node)
            .collect(),
        top_tags,
        top_suggestions: first_list_at(payload, TOP_SUGGESTIONS_PRECEDENCE)
            .iter()
            .filter_map(top_suggestion)
            .collect(),
        high_degree_nodes: first_list_at(payload, HIGH_DEGREE_PRECEDENCE)
            .iter()
            .filter_map(high_degree_node)
            .collect(),
        recent_count: first_count_at(payload, RECENT_COUNT_PRECEDENCE),
        high_score_suggestion_count: first_count_at(payload, HIGH_SCORE_COUNT_PRECEDENCE),
    }
}
