//! CLI command implementations

use anyhow::Context;
use graphwire_client::{GraphClient, ListQuery, NodeDetailOptions, Refresh};
use graphwire_stream::{CacheSync, ChannelHandler, EventStreamClient, StreamNotice};
use serde::Serialize;
use std::sync::Arc;

use crate::config::Settings;

fn client(settings: &Settings) -> anyhow::Result<GraphClient> {
    GraphClient::new(settings.client.clone()).context("Failed to build HTTP client")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list_query(search: Option<String>, limit: Option<u32>) -> ListQuery {
    let mut query = ListQuery::new();
    if let Some(search) = search {
        query = query.search(search);
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    query
}

pub async fn health(settings: &Settings) -> anyhow::Result<()> {
    let health = client(settings)?
        .health()
        .await
        .with_context(|| format!("Health check against {} failed", settings.client.base_url))?;
    print_json(&health)
}

pub async fn stats(settings: &Settings) -> anyhow::Result<()> {
    let stats = client(settings)?.stats().await.context("Failed to fetch stats")?;
    print_json(&stats)
}

pub async fn nodes(
    settings: &Settings,
    search: Option<String>,
    tags: Vec<String>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> anyhow::Result<()> {
    let mut query = list_query(search, limit);
    if let Some(offset) = offset {
        query = query.offset(offset);
    }
    for tag in tags {
        query = query.tag(tag);
    }

    let page = client(settings)?
        .list_nodes(&query)
        .await
        .context("Failed to list nodes")?;
    tracing::info!("Showing {} of {} nodes", page.items.len(), page.total);
    print_json(&page)
}

pub async fn tags(
    settings: &Settings,
    search: Option<String>,
    limit: Option<u32>,
    counts: bool,
) -> anyhow::Result<()> {
    let query = list_query(search, limit).include_counts(counts);
    let tags = client(settings)?
        .list_tags(&query)
        .await
        .context("Failed to list tags")?;
    print_json(&tags)
}

pub async fn node(settings: &Settings, id: &str, content: bool, refresh: bool) -> anyhow::Result<()> {
    let client = client(settings)?;
    let refresh = if refresh { Refresh::Force } else { Refresh::Cached };

    if content {
        let content = client
            .node_content(id, refresh)
            .await
            .with_context(|| format!("Failed to fetch content of node {}", id))?;
        return print_json(&content);
    }

    let detail = client
        .node_detail(id, &NodeDetailOptions::full(), refresh)
        .await
        .with_context(|| format!("Failed to fetch node {}", id))?;
    print_json(&detail)
}

/// Follow the event stream until Ctrl-C.
pub async fn watch(settings: &Settings) -> anyhow::Result<()> {
    let graph = Arc::new(client(settings)?);
    let stream = EventStreamClient::new(&settings.client, &settings.stream)
        .context("Failed to derive event stream URL")?;
    tracing::info!("Watching {}", stream.url());

    let (printer, mut notices) = ChannelHandler::new();
    let handler = CacheSync::new(graph).forward_to(Arc::new(printer));
    let subscription = stream.subscribe(Arc::new(handler));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            notice = notices.recv() => match notice {
                Some(StreamNotice::Event(event)) => print_json(&event)?,
                Some(StreamNotice::Status(state)) => tracing::info!("Event stream {}", state),
                Some(StreamNotice::Error(e)) => tracing::warn!("{}", e),
                None => break,
            },
        }
    }

    subscription.shutdown().await;
    Ok(())
}
