use crate::graph::{Graph, GraphNode, NodeData};
use crate::style::{
    edge_label_opacity, get_edge_style_with_state, get_header_colors, get_node_colors_with_state,
};
use fleetgraph_core::{ResourceKind, StatusBucket};
use std::collections::BTreeSet;

/// Active kind, status and text filters.
///
/// The kind set is never empty: removing the last kind is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    kinds: BTreeSet<ResourceKind>,
    statuses: BTreeSet<StatusBucket>,
    query: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            kinds: ResourceKind::ALL.into_iter().collect(),
            statuses: BTreeSet::new(),
            query: String::new(),
        }
    }
}

impl FilterState {
    /// An empty `kinds` falls back to every kind.
    pub fn new(
        kinds: impl IntoIterator<Item = ResourceKind>,
        statuses: impl IntoIterator<Item = StatusBucket>,
        query: &str,
    ) -> Self {
        let mut state = Self::default();
        state.set_kinds(kinds);
        state.statuses = statuses.into_iter().collect();
        state.set_query(query);
        state
    }

    /// Replaces the allowed kinds. An empty set is ignored and `false` returned.
    pub fn set_kinds(&mut self, kinds: impl IntoIterator<Item = ResourceKind>) -> bool {
        let kinds: BTreeSet<_> = kinds.into_iter().collect();
        if kinds.is_empty() {
            tracing::debug!("Refusing to clear every kind from the filter");
            return false;
        }
        self.kinds = kinds;
        true
    }

    /// Adds or removes one kind. Removing the last remaining kind is refused.
    pub fn toggle_kind(&mut self, kind: ResourceKind) -> bool {
        if self.kinds.contains(&kind) {
            if self.kinds.len() == 1 {
                return false;
            }
            self.kinds.remove(&kind);
        } else {
            self.kinds.insert(kind);
        }
        true
    }

    /// Stored lowercased. Whitespace is significant: only an empty query
    /// turns highlighting off.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_lowercase();
    }

    pub fn kinds(&self) -> &BTreeSet<ResourceKind> {
        &self.kinds
    }

    pub fn statuses(&self) -> &BTreeSet<StatusBucket> {
        &self.statuses
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    /// Kind AND status AND text match. Headers match on kind alone.
    pub fn matches(&self, node: &GraphNode) -> bool {
        if !self.kinds.contains(&node.kind) {
            return false;
        }
        let NodeData::Resource(resource) = &node.data else {
            return true;
        };

        let status_ok =
            self.statuses.is_empty() || self.statuses.contains(&resource.status.bucket());
        let query_ok = self.query.is_empty()
            || resource.label.to_lowercase().contains(&self.query)
            || resource.namespace.to_lowercase().contains(&self.query);

        status_ok && query_ok
    }
}

/// Projects `filter` onto a copy of `graph`.
///
/// Non-matching nodes are dimmed rather than removed. Matching resource nodes
/// are highlighted only while a text query is active. Edges dim when either
/// endpoint is dimmed, and animate only when undimmed with a ready source.
pub fn apply(graph: &Graph, filter: &FilterState) -> Graph {
    let mut view = graph.clone();

    for node in view.nodes_mut() {
        let matched = filter.matches(node);
        node.dimmed = !matched;
        node.highlighted = matched && filter.has_query() && !node.is_header();
        node.colors = match node.as_resource() {
            Some(resource) => get_node_colors_with_state(
                resource.status.bucket(),
                node.dimmed,
                node.highlighted,
            ),
            None => get_header_colors(node.kind, node.dimmed),
        };
    }

    let node_states: Vec<(bool, bool)> = view
        .nodes()
        .iter()
        .map(|node| {
            let ready = node
                .as_resource()
                .is_some_and(|r| r.status.bucket() == StatusBucket::Ready);
            (node.dimmed, ready)
        })
        .collect();

    for edge in view.edges_mut() {
        let (source_dimmed, source_ready) = node_states[edge.source_idx.0];
        let (target_dimmed, _) = node_states[edge.target_idx.0];
        edge.dimmed = source_dimmed || target_dimmed;
        edge.animated = !edge.dimmed && source_ready;
        edge.label_opacity = edge_label_opacity(edge.dimmed);
        edge.color = get_edge_style_with_state(edge.kind, edge.dimmed).color;
    }

    view
}
