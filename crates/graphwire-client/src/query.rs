//! Query-string parameters for list and detail requests

/// Ordered `(name, value)` pairs; repeated names are allowed.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Paging and filtering for `GET nodes` and `GET tags`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub search: Option<String>,
    /// Sent as one `tags=` pair per entry.
    pub tags: Vec<String>,
    pub include_counts: Option<bool>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn include_counts(mut self, include: bool) -> Self {
        self.include_counts = Some(include);
        self
    }

    /// Unset fields and blank searches are omitted.
    pub fn to_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        for tag in &self.tags {
            pairs.push(("tags", tag.clone()));
        }
        if let Some(include) = self.include_counts {
            pairs.push(("includeCounts", include.to_string()));
        }
        pairs
    }
}

/// What to embed in `GET nodes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDetailOptions {
    pub include_body: Option<bool>,
    pub include_edges: Option<bool>,
    pub include_suggestions: Option<bool>,
    pub edges_limit: Option<u32>,
    pub suggestions_limit: Option<u32>,
}

impl NodeDetailOptions {
    /// Body, edges and suggestions, with server-default limits.
    pub fn full() -> Self {
        Self {
            include_body: Some(true),
            include_edges: Some(true),
            include_suggestions: Some(true),
            ..Self::default()
        }
    }

    pub fn to_pairs(&self) -> QueryPairs {
        let flags = [
            ("includeBody", self.include_body.map(|b| b.to_string())),
            ("includeEdges", self.include_edges.map(|b| b.to_string())),
            ("includeSuggestions", self.include_suggestions.map(|b| b.to_string())),
            ("edgesLimit", self.edges_limit.map(|n| n.to_string())),
            ("suggestionsLimit", self.suggestions_limit.map(|n| n.to_string())),
        ];
        flags
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}
