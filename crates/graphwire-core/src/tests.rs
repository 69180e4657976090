//! Unit tests for graphwire-core normalizers

use crate::*;
use serde_json::json;

#[test]
fn test_health_explicit_flag_wins() {
    let health = normalize_health(&json!({"ok": false, "status": "healthy"}));
    assert!(!health.ok);
    assert_eq!(health.status.as_deref(), Some("healthy"));
}

#[test]
fn test_health_status_words() {
    assert!(normalize_health(&json!({"status": "HEALTHY"})).ok);
    assert!(normalize_health(&json!({"status": "Ok"})).ok);
    // Unrecognised status words do not flip the default.
    assert!(normalize_health(&json!({"status": "degraded"})).ok);
    assert!(normalize_health(&json!(null)).ok);
}

#[test]
fn test_health_fields() {
    let health = normalize_health(&json!({
        "status": "ok",
        "version": 3,
        "databasePath": "/var/lib/graph.db",
        "uptimeSeconds": 12.5,
        "message": ["not", "a", "string"]
    }));
    assert_eq!(
        health,
        HealthStatus {
            ok: true,
            status: Some("ok".into()),
            version: Some("3".into()),
            database_path: Some("/var/lib/graph.db".into()),
            message: None,
            uptime_seconds: Some(12.5),
        }
    );
}

#[test]
fn test_node_list_shapes() {
    let bare = normalize_node_list(&json!([{"id": "a"}, {"id": "b"}]));
    assert_eq!(bare.items.len(), 2);
    assert_eq!(bare.total, 2);
    assert_eq!(bare.limit, None);

    let paged = normalize_node_list(&json!({
        "items": [{"id": "a", "title": "A", "tags": ["x"], "bodyPreview": "...", "bodyLength": 40}],
        "total": 90,
        "limit": 1,
        "offset": 10
    }));
    assert_eq!(paged.total, 90);
    assert_eq!(paged.limit, Some(1));
    assert_eq!(paged.offset, Some(10));
    assert_eq!(paged.items[0].body_length, Some(40));
    assert_eq!(paged.items[0].tags, vec!["x"]);

    let legacy = normalize_node_list(&json!({"nodes": [{"id": 1}, {"title": "orphan"}]}));
    assert_eq!(legacy.items.len(), 1);
    assert_eq!(legacy.items[0].id, "1");
    assert_eq!(legacy.total, 1);

    assert_eq!(normalize_node_list(&json!(null)), NodeListPage::default());
}

#[test]
fn test_tag_list_shapes() {
    let expected = vec![
        TagSummary { name: "rust".into(), count: Some(4) },
        TagSummary { name: "graphs".into(), count: None },
    ];
    let items = json!([{"name": "rust", "count": 4}, "graphs"]);
    assert_eq!(normalize_tag_list(&items), expected);
    assert_eq!(normalize_tag_list(&json!({"items": items})), expected);
    assert_eq!(normalize_tag_list(&json!({"tags": items})), expected);
    assert!(normalize_tag_list(&json!({"count": 2})).is_empty());
}

#[test]
fn test_flat_stats_scenario() {
    let stats = normalize_stats(&json!({"nodes": 524, "edges": 1242, "suggestedEdges": 42, "tags": 87}));
    assert_eq!(stats.nodes, Some(524));
    assert_eq!(stats.edges, Some(1242));
    assert_eq!(stats.suggested_edges, Some(42));
    assert_eq!(stats.tags, Some(87));
    assert!(stats.recent_nodes.is_empty());
    assert!(stats.top_tags.is_empty());
    assert!(stats.top_suggestions.is_empty());
    assert!(stats.high_degree_nodes.is_empty());
}

#[test]
fn test_enveloped_detail_end_to_end() {
    let payload = unwrap_envelope(json!({
        "success": true,
        "data": {
            "id": "n1",
            "edges": {"accepted": [{"sourceId": "n1", "targetId": "n2"}, {"sourceId": "n2", "targetId": "n1"}],
                      "suggested": [{"sourceId": "n1", "targetId": "n3"}]}
        }
    }))
    .unwrap();
    let detail = normalize_node_detail(&payload, "n1").unwrap();
    assert_eq!(detail.edges.len(), 2);
    assert_eq!(detail.suggestions.len(), 1);
    assert_eq!(detail.edges_total, 2);
    assert_eq!(detail.suggestions_total, 1);
}

#[test]
fn test_canonical_records_serialize_camel_case() {
    let detail = normalize_node_detail(&json!({"bodyLength": 3}), "n1").unwrap();
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["bodyLength"], json!(3));
    assert_eq!(json["edgesTotal"], json!(0));

    let edge = normalize_edge(&json!({"sourceId": "n1"}), "n1");
    assert_eq!(serde_json::to_value(&edge).unwrap()["direction"], json!("out"));
}
