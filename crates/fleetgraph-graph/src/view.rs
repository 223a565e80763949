use crate::builder::GraphBuilder;
use crate::filter::{self, FilterState};
use crate::fingerprint::{ChangeDetector, Fingerprint};
use crate::graph::{Graph, GraphEdge, GraphNode, Vec2};
use crate::layout::{layout_graph, place_headers};
use crate::locks::PositionLocks;
use crate::settings::{LayoutSettings, Viewport};
use fleetgraph_core::{LayoutDirection, NodeId, ResourceKind, ResourceSet, StatusBucket};
use fleetgraph_events::{Event, EventListener, LayoutAlgorithm};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// What the renderer draws: positioned nodes and edges with filter flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// While set the renderer must not let nodes be dragged.
    pub positions_locked: bool,
}

/// State for one graph view instance.
///
/// Owns the pinned positions, the last fingerprint and the cached layout, so
/// independent views never share them. The builder, layout and filter it
/// drives are pure functions of what it passes in.
pub struct GraphView {
    id: Uuid,
    settings: LayoutSettings,
    locks: PositionLocks,
    detector: ChangeDetector,
    cached_positions: HashMap<NodeId, Vec2>,
    filter: FilterState,
    graph: Graph,
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

impl GraphView {
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            settings,
            locks: PositionLocks::new(),
            detector: ChangeDetector::new(),
            cached_positions: HashMap::new(),
            filter: FilterState::default(),
            graph: Graph::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn locks(&self) -> &PositionLocks {
        &self.locks
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn viewport(&self) -> Viewport {
        self.settings.viewport
    }

    /// Canonical positioned graph, before filter projection.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn builder(&self) -> GraphBuilder {
        GraphBuilder::new(Vec2::new(self.settings.node_width, self.settings.node_height))
    }

    /// Rebuild from a fresh snapshot. Layout runs only when the fingerprint
    /// changed; otherwise cached positions are carried over.
    pub fn update(&mut self, resources: &ResourceSet) -> GraphSnapshot {
        let structural = self.detector.observe(Fingerprint::of(resources));
        let mut graph = self.builder().build(resources);

        if structural || !self.cache_covers(&graph) {
            tracing::debug!(
                view = %self.id,
                structural,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "Recomputing layout"
            );
            self.run_layout(&mut graph);
        } else {
            tracing::debug!(view = %self.id, "Topology unchanged, reusing layout");
            for node in graph.nodes_mut() {
                if let Some(position) = self
                    .locks
                    .get(&node.id)
                    .or_else(|| self.cached_positions.get(&node.id).copied())
                {
                    node.position = position;
                }
            }
        }

        self.cached_positions = graph.positions();
        self.graph = graph;
        self.snapshot()
    }

    fn cache_covers(&self, graph: &Graph) -> bool {
        graph
            .nodes()
            .iter()
            .all(|node| self.cached_positions.contains_key(&node.id))
    }

    fn run_layout(&self, graph: &mut Graph) {
        let layouter = self.settings.layouter();
        layout_graph(
            layouter.as_ref(),
            graph,
            &self.locks,
            &self.settings.header_placement(),
        );
    }

    fn relayout_current(&mut self) {
        let mut graph = std::mem::take(&mut self.graph);
        self.run_layout(&mut graph);
        self.cached_positions = graph.positions();
        self.graph = graph;
    }

    /// Filtered projection of the current graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        let (nodes, edges) = filter::apply(&self.graph, &self.filter).into_parts();
        GraphSnapshot {
            nodes,
            edges,
            positions_locked: self.locks.is_locked(),
        }
    }

    /// Pin a node where the user dropped it. Headers and unknown ids are
    /// ignored, as is everything while positions are locked.
    pub fn on_node_drag_stop(&mut self, id: &NodeId, position: Vec2) -> GraphSnapshot {
        let draggable = self.graph.get_node(id).is_some_and(|node| !node.is_header());
        if !draggable {
            tracing::debug!(view = %self.id, "Ignoring drag of non-resource node {}", id);
            return self.snapshot();
        }

        if self.locks.record_drag(id.clone(), position) {
            if let Some(node) = self.graph.get_node_mut(id) {
                node.position = position;
            }
            place_headers(&mut self.graph, &self.settings.header_placement());
            self.cached_positions = self.graph.positions();
        }
        self.snapshot()
    }

    /// Drop every pin and lay the current graph out from scratch.
    pub fn on_relayout_requested(&mut self) -> GraphSnapshot {
        tracing::info!(view = %self.id, pinned = self.locks.len(), "Re-layout requested");
        self.locks.clear_all();
        self.relayout_current();
        self.snapshot()
    }

    /// Replace the filter. An empty kind list keeps the current kinds.
    pub fn on_filter_changed(
        &mut self,
        kinds: &[ResourceKind],
        statuses: &[StatusBucket],
        query: &str,
    ) -> GraphSnapshot {
        let kinds: Vec<ResourceKind> = if kinds.is_empty() {
            self.filter.kinds().iter().copied().collect()
        } else {
            kinds.to_vec()
        };
        self.filter = FilterState::new(kinds, statuses.iter().copied(), query);
        self.snapshot()
    }

    pub fn set_positions_locked(&mut self, locked: bool) {
        self.locks.toggle_locked(locked);
    }

    pub fn set_layout_algorithm(&mut self, algorithm: LayoutAlgorithm) {
        if self.settings.algorithm != algorithm {
            self.settings.algorithm = algorithm;
            self.relayout_current();
        }
    }

    pub fn set_layout_direction(&mut self, direction: LayoutDirection) {
        if self.settings.direction != direction {
            self.settings.direction = direction;
            self.relayout_current();
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.settings.viewport = viewport;
    }
}

impl EventListener for GraphView {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::SnapshotReceived { resources } => {
                self.update(resources);
            }
            Event::NodeDragStop { id, x, y } => {
                self.on_node_drag_stop(id, Vec2::new(*x, *y));
            }
            Event::ReLayoutRequested => {
                self.on_relayout_requested();
            }
            Event::SetPositionsLocked(locked) => self.set_positions_locked(*locked),
            Event::FilterChanged {
                kinds,
                statuses,
                query,
            } => {
                self.on_filter_changed(kinds, statuses, query);
            }
            Event::SetLayoutMethod(algorithm) => self.set_layout_algorithm(*algorithm),
            Event::SetLayoutDirection(direction) => self.set_layout_direction(*direction),
            Event::ViewportChanged { x, y, zoom } => self.set_viewport(Viewport {
                x: *x,
                y: *y,
                zoom: *zoom,
            }),
        }
    }
}
