//! High-level graph service client

use graphwire_core::{
    GraphStats, HealthStatus, NodeContent, NodeDetail, NodeListPage, Result, TagSummary,
    normalize_health, normalize_node_content, normalize_node_detail, normalize_node_list,
    normalize_stats, normalize_tag_list,
};
use tracing::debug;

use crate::cache::ResourceCache;
use crate::config::ClientConfig;
use crate::executor::RequestExecutor;
use crate::query::{ListQuery, NodeDetailOptions};

/// Whether a cached value may be reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Refresh {
    /// Serve from cache when present.
    #[default]
    Cached,
    /// Evict, fetch, and repopulate.
    Force,
}

/// Fetches canonical graph records and keeps the per-node caches.
#[derive(Debug)]
pub struct GraphClient {
    config: ClientConfig,
    executor: RequestExecutor,
    content_cache: ResourceCache<NodeContent>,
    detail_cache: ResourceCache<NodeDetail>,
}

impl GraphClient {
    /// Caches start empty and fill lazily.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let executor = RequestExecutor::new(&config)?;
        Ok(Self {
            config,
            executor,
            content_cache: ResourceCache::new("node-content"),
            detail_cache: ResourceCache::new("node-detail"),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn content_cache(&self) -> &ResourceCache<NodeContent> {
        &self.content_cache
    }

    pub fn detail_cache(&self) -> &ResourceCache<NodeDetail> {
        &self.detail_cache
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let payload = self.executor.get(&["health"], &[]).await?;
        Ok(normalize_health(&payload))
    }

    pub async fn stats(&self) -> Result<GraphStats> {
        let payload = self.executor.get(&["stats"], &[]).await?;
        Ok(normalize_stats(&payload))
    }

    pub async fn list_nodes(&self, query: &ListQuery) -> Result<NodeListPage> {
        let payload = self.executor.get(&["nodes"], &query.to_pairs()).await?;
        Ok(normalize_node_list(&payload))
    }

    pub async fn list_tags(&self, query: &ListQuery) -> Result<Vec<TagSummary>> {
        let payload = self.executor.get(&["tags"], &query.to_pairs()).await?;
        Ok(normalize_tag_list(&payload))
    }

    /// Full body of a node.
    pub async fn node_content(&self, id: &str, refresh: Refresh) -> Result<NodeContent> {
        match refresh {
            Refresh::Force => {
                self.content_cache.evict(id);
            }
            Refresh::Cached => {
                if let Some(hit) = self.content_cache.get(id) {
                    debug!("node-content cache hit for {}", id);
                    return Ok(hit);
                }
            }
        }

        let payload = self.executor.get(&["nodes", id, "content"], &[]).await?;
        let content = normalize_node_content(&payload, id)?;
        self.content_cache.set(id, content.clone());
        Ok(content)
    }

    /// A node with its edges and suggestions. Cached per id regardless of
    /// `options`.
    pub async fn node_detail(
        &self,
        id: &str,
        options: &NodeDetailOptions,
        refresh: Refresh,
    ) -> Result<NodeDetail> {
        match refresh {
            Refresh::Force => {
                self.detail_cache.evict(id);
            }
            Refresh::Cached => {
                if let Some(hit) = self.detail_cache.get(id) {
                    debug!("node-detail cache hit for {}", id);
                    return Ok(hit);
                }
            }
        }

        let payload = self.executor.get(&["nodes", id], &options.to_pairs()).await?;
        let detail = normalize_node_detail(&payload, id)?;
        self.detail_cache.set(id, detail.clone());
        Ok(detail)
    }

    /// Drop both cached views of a node.
    pub fn evict_node(&self, id: &str) {
        self.content_cache.evict(id);
        self.detail_cache.evict(id);
    }

    pub fn clear_caches(&self) {
        self.content_cache.clear();
        self.detail_cache.clear();
    }
}
