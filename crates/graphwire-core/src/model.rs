//! Canonical records handed to consumers of the graph service.
//!
//! These are the only shapes the rest of the application ever sees. The server
//! may emit any number of variants of each; [`crate::normalize`] folds them all
//! into these structs.

use serde::{Deserialize, Serialize};

/// Service health as reported by `GET health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub ok: bool,
    pub status: Option<String>,
    pub version: Option<String>,
    pub database_path: Option<String>,
    pub message: Option<String>,
    pub uptime_seconds: Option<f64>,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            ok: true,
            status: None,
            version: None,
            database_path: None,
            message: None,
            uptime_seconds: None,
        }
    }
}

/// Aggregate counts plus the derived "dashboard" lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub nodes: Option<u64>,
    pub edges: Option<u64>,
    pub suggested_edges: Option<u64>,
    pub tags: Option<u64>,
    pub recent_nodes: Vec<RecentNode>,
    pub top_tags: Vec<TagSummary>,
    pub top_suggestions: Vec<SuggestionSummary>,
    pub high_degree_nodes: Vec<HighDegreeNode>,
    pub recent_count: Option<u64>,
    pub high_score_suggestion_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentNode {
    pub id: String,
    pub title: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionSummary {
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighDegreeNode {
    pub id: String,
    pub title: Option<String>,
    pub edge_count: Option<u64>,
}

/// A node as it appears in list responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub id: String,
    pub title: Option<String>,
    /// Insertion order preserved, duplicates removed.
    pub tags: Vec<String>,
    pub body_preview: Option<String>,
    pub body_length: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// One page of `GET nodes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeListPage {
    pub items: Vec<NodeSummary>,
    /// Server-reported total, or the number of items when the server omits it.
    pub total: u64,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Full body of a node from `GET nodes/{id}/content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeContent {
    pub id: String,
    pub title: Option<String>,
    pub body: String,
    pub tags: Vec<String>,
    pub body_length: Option<u64>,
    pub updated_at: Option<String>,
}

/// A node together with its neighbourhood, from `GET nodes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetail {
    pub id: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Vec<String>,
    pub body_length: Option<u64>,
    pub edges: Vec<EdgeRecord>,
    pub edges_total: u64,
    pub suggestions: Vec<EdgeRecord>,
    pub suggestions_total: u64,
}

/// Orientation of an edge relative to the node it was fetched under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
    Bidirectional,
    /// Neither endpoint could be matched to the queried node.
    #[default]
    Undefined,
}

impl Direction {
    /// Derive the direction of `source -> target` as seen from `node_id`.
    pub fn relative_to(node_id: &str, source: Option<&str>, target: Option<&str>) -> Self {
        let from_here = source == Some(node_id);
        let to_here = target == Some(node_id);
        match (from_here, to_here) {
            (true, true) => Direction::Bidirectional,
            (true, false) => Direction::Out,
            (false, true) => Direction::In,
            (false, false) => Direction::Undefined,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: Option<String>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub direction: Direction,
    /// Always finite when present.
    pub score: Option<f64>,
    pub status: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub to_title: Option<String>,
    pub from_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSummary {
    pub name: String,
    pub count: Option<u64>,
}
