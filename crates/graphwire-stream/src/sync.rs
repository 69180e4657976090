//! Keeps the client's caches consistent with push events.
//!
//! Events are only hints: entries are evicted and, optionally, re-fetched from
//! the service. Payload contents are never written into a cache.

use std::sync::Arc;

use graphwire_client::{GraphClient, NodeDetailOptions, Refresh};
use graphwire_core::DomainEvent;
use tracing::{debug, warn};

use crate::error::StreamError;
use crate::handler::EventHandler;
use crate::state::ConnectionState;

/// Ids evicted for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    pub content: Vec<String>,
    pub detail: Vec<String>,
    /// Id of the node that no longer exists, for `node:deleted`.
    pub deleted: Option<String>,
}

impl Invalidation {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.detail.is_empty()
    }
}

/// [`EventHandler`] that invalidates a [`GraphClient`]'s caches and then
/// forwards every callback downstream.
pub struct CacheSync {
    client: Arc<GraphClient>,
    downstream: Option<Arc<dyn EventHandler>>,
    refetch: bool,
    refetch_options: NodeDetailOptions,
}

impl CacheSync {
    pub fn new(client: Arc<GraphClient>) -> Self {
        Self {
            client,
            downstream: None,
            refetch: false,
            refetch_options: NodeDetailOptions::full(),
        }
    }

    pub fn forward_to(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.downstream = Some(handler);
        self
    }

    /// Re-fetch the detail entry of an updated node in the background.
    /// Deletions, edge events and tag renames only evict.
    pub fn with_refetch(mut self, options: NodeDetailOptions) -> Self {
        self.refetch = true;
        self.refetch_options = options;
        self
    }

    /// Evict whatever `event` makes stale.
    pub fn invalidate(&self, event: &DomainEvent) -> Invalidation {
        let content = self.client.content_cache();
        let detail = self.client.detail_cache();
        let mut invalidation = Invalidation::default();

        match event {
            DomainEvent::NodeUpdated(node) | DomainEvent::NodeDeleted(node) => {
                let Some(id) = node.node_id.as_deref() else {
                    debug!("{} without a node id, nothing to evict", event.kind());
                    return invalidation;
                };
                if content.evict(id) {
                    invalidation.content.push(id.to_string());
                }
                if detail.evict(id) {
                    invalidation.detail.push(id.to_string());
                }
                if matches!(event, DomainEvent::NodeDeleted(_)) {
                    invalidation.deleted = Some(id.to_string());
                }
            }
            DomainEvent::EdgeCreated(edge)
            | DomainEvent::EdgeAccepted(edge)
            | DomainEvent::EdgeRejected(edge)
            | DomainEvent::EdgeDeleted(edge) => {
                for id in edge.endpoints() {
                    if detail.evict(id) {
                        invalidation.detail.push(id.to_string());
                    }
                }
            }
            DomainEvent::TagRenamed(rename) => {
                let Some(old) = rename.old_name.as_deref() else {
                    return invalidation;
                };
                invalidation.content =
                    content.evict_where(|_, node| node.tags.iter().any(|tag| tag == old));
                invalidation.detail =
                    detail.evict_where(|_, node| node.tags.iter().any(|tag| tag == old));
            }
            DomainEvent::NodeCreated(_) | DomainEvent::Other { .. } => {}
        }

        if !invalidation.is_empty() {
            debug!(
                "{} evicted {} content / {} detail entries",
                event.kind(),
                invalidation.content.len(),
                invalidation.detail.len()
            );
        }
        invalidation
    }

    fn spawn_refetch(&self, event: &DomainEvent, invalidation: &Invalidation) {
        if !matches!(event, DomainEvent::NodeUpdated(_)) {
            return;
        }
        for id in &invalidation.detail {
            debug!("Re-fetching node {}", id);
            let client = Arc::clone(&self.client);
            let options = self.refetch_options.clone();
            let id = id.clone();
            tokio::spawn(async move {
                if let Err(e) = client.node_detail(&id, &options, Refresh::Force).await {
                    warn!("Re-fetch of node {} failed: {}", id, e);
                }
            });
        }
    }
}

impl EventHandler for CacheSync {
    fn on_event(&self, event: DomainEvent) {
        let invalidation = self.invalidate(&event);
        if self.refetch {
            self.spawn_refetch(&event, &invalidation);
        }
        if let Some(downstream) = &self.downstream {
            downstream.on_event(event);
        }
    }

    fn on_status(&self, state: ConnectionState) {
        if let Some(downstream) = &self.downstream {
            downstream.on_status(state);
        }
    }

    fn on_error(&self, error: StreamError) {
        if let Some(downstream) = &self.downstream {
            downstream.on_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{ChannelHandler, StreamNotice};
    use graphwire_client::ClientConfig;
    use graphwire_core::{
        EdgeEvent, NodeEvent, TagRenamedEvent, normalize_node_content, normalize_node_detail,
    };
    use serde_json::json;

    fn seeded_client() -> Arc<GraphClient> {
        let client = GraphClient::new(ClientConfig::default()).unwrap();
        for (id, tags) in [("n1", json!(["rust"])), ("n2", json!(["graphs"])), ("n3", json!([]))] {
            let payload = json!({"id": id, "body": "text", "tags": tags});
            client
                .content_cache()
                .set(id, normalize_node_content(&payload, id).unwrap());
            client
                .detail_cache()
                .set(id, normalize_node_detail(&payload, id).unwrap());
        }
        Arc::new(client)
    }

    fn node(id: &str) -> NodeEvent {
        NodeEvent {
            node_id: Some(id.to_string()),
        }
    }

    #[test]
    fn test_node_deleted_evicts_both_caches() {
        let client = seeded_client();
        let sync = CacheSync::new(Arc::clone(&client));

        let invalidation = sync.invalidate(&DomainEvent::NodeDeleted(node("n1")));
        assert_eq!(invalidation.content, vec!["n1"]);
        assert_eq!(invalidation.detail, vec!["n1"]);
        assert_eq!(invalidation.deleted.as_deref(), Some("n1"));
        assert!(!client.content_cache().contains("n1"));
        assert!(!client.detail_cache().contains("n1"));
        assert!(client.content_cache().contains("n2"));
    }

    #[test]
    fn test_edge_events_only_touch_endpoint_details() {
        let client = seeded_client();
        let sync = CacheSync::new(Arc::clone(&client));

        let edge = EdgeEvent {
            edge_id: Some("e1".into()),
            source_id: Some("n1".into()),
            target_id: Some("n2".into()),
        };
        let invalidation = sync.invalidate(&DomainEvent::EdgeAccepted(edge));
        assert_eq!(invalidation.detail, vec!["n1", "n2"]);
        assert!(invalidation.content.is_empty());
        assert_eq!(client.content_cache().len(), 3);
        assert!(client.detail_cache().contains("n3"));
    }

    #[test]
    fn test_tag_rename_evicts_tagged_nodes() {
        let client = seeded_client();
        let sync = CacheSync::new(Arc::clone(&client));

        let rename = TagRenamedEvent {
            old_name: Some("rust".into()),
            new_name: Some("rustlang".into()),
        };
        let invalidation = sync.invalidate(&DomainEvent::TagRenamed(rename));
        assert_eq!(invalidation.content, vec!["n1"]);
        assert_eq!(invalidation.detail, vec!["n1"]);
        assert_eq!(client.content_cache().len(), 2);
    }

    #[test]
    fn test_created_and_unknown_events_are_ignored() {
        let client = seeded_client();
        let sync = CacheSync::new(Arc::clone(&client));

        assert!(sync.invalidate(&DomainEvent::NodeCreated(node("n9"))).is_empty());
        let other = DomainEvent::Other {
            kind: "graph:rebuilt".into(),
            fields: Default::default(),
        };
        assert!(sync.invalidate(&other).is_empty());
        assert!(sync.invalidate(&DomainEvent::NodeUpdated(NodeEvent::default())).is_empty());
        assert_eq!(client.detail_cache().len(), 3);
    }

    #[test]
    fn test_forwards_to_downstream() {
        let client = seeded_client();
        let (handler, mut rx) = ChannelHandler::new();
        let sync = CacheSync::new(client).forward_to(Arc::new(handler));

        sync.on_status(ConnectionState::Connected);
        sync.on_event(DomainEvent::NodeUpdated(node("n2")));
        sync.on_error(StreamError::Closed);

        assert!(matches!(rx.try_recv(), Ok(StreamNotice::Status(ConnectionState::Connected))));
        assert!(matches!(rx.try_recv(), Ok(StreamNotice::Event(DomainEvent::NodeUpdated(_)))));
        assert!(matches!(rx.try_recv(), Ok(StreamNotice::Error(StreamError::Closed))));
    }
}
