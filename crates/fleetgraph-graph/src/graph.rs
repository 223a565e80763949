use crate::style::{Color, NodeColors};
use fleetgraph_core::{EdgeId, EdgeKind, NodeId, ResourceKind, StatusPhase};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeIndex(pub usize);

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub label: String,
    pub namespace: String,
    pub status: StatusPhase,
    pub status_message: Option<String>,
}

/// Non-interactive column header counting the members of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupHeaderNode {
    pub label: String,
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    Resource(ResourceNode),
    Header(GroupHeaderNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: ResourceKind,
    pub data: NodeData,

    // Visual properties
    pub position: Vec2,
    pub size: Vec2,
    pub dimmed: bool,
    pub highlighted: bool,
    pub colors: NodeColors,
}

impl GraphNode {
    pub fn is_header(&self) -> bool {
        matches!(self.data, NodeData::Header(_))
    }

    pub fn as_resource(&self) -> Option<&ResourceNode> {
        match &self.data {
            NodeData::Resource(resource) => Some(resource),
            NodeData::Header(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match &self.data {
            NodeData::Resource(resource) => &resource.label,
            NodeData::Header(header) => &header.label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub label: String,
    pub style_class: String,
    pub color: Color,
    pub dimmed: bool,
    pub animated: bool,
    pub label_opacity: f32,
    #[serde(skip)]
    pub source_idx: NodeIndex,
    #[serde(skip)]
    pub target_idx: NodeIndex,
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex(usize::MAX)
    }
}

/// Node/edge container with identity lookup.
///
/// Edges are only accepted when both endpoints are present, so the graph never
/// holds a dangling edge.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_map: HashMap<NodeId, NodeIndex>,
    edge_map: HashMap<EdgeId, EdgeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node unless one with the same id exists; returns its index either way.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node.id) {
            tracing::debug!("Ignoring duplicate node {}", node.id);
            return idx;
        }
        let idx = NodeIndex(self.nodes.len());
        self.node_map.insert(node.id.clone(), idx);
        self.nodes.push(node);
        idx
    }

    /// Adds an edge between two existing nodes. Edges whose endpoints are
    /// missing, or whose id is already present, are not added.
    pub fn add_edge(&mut self, mut edge: GraphEdge) -> Option<EdgeIndex> {
        let (Some(&source_idx), Some(&target_idx)) =
            (self.node_map.get(&edge.source), self.node_map.get(&edge.target))
        else {
            tracing::debug!("Dropping edge {} with a missing endpoint", edge.id);
            return None;
        };
        if let Some(&existing) = self.edge_map.get(&edge.id) {
            return Some(existing);
        }

        edge.source_idx = source_idx;
        edge.target_idx = target_idx;
        let idx = EdgeIndex(self.edges.len());
        self.edge_map.insert(edge.id.clone(), idx);
        self.edges.push(edge);
        Some(idx)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut GraphNode> {
        self.nodes.iter_mut()
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut GraphEdge> {
        self.edges.iter_mut()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    /// Indices of resource nodes, in insertion order. Headers are skipped.
    pub fn resource_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.node_indices().filter(|&idx| !self[idx].is_header())
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> {
        (0..self.edges.len()).map(EdgeIndex)
    }

    pub fn edge_endpoints(&self, index: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.edges
            .get(index.0)
            .map(|e| (e.source_idx, e.target_idx))
    }

    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.node_map.get(id).map(|&idx| &self.nodes[idx.0])
    }

    pub fn get_node_mut(&mut self, id: &NodeId) -> Option<&mut GraphNode> {
        self.node_map.get(id).map(|&idx| &mut self.nodes[idx.0])
    }

    pub fn get_edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edge_map.get(id).map(|&idx| &self.edges[idx.0])
    }

    /// Current position of every node keyed by identity.
    pub fn positions(&self) -> HashMap<NodeId, Vec2> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.position))
            .collect()
    }

    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }
}

impl Index<NodeIndex> for Graph {
    type Output = GraphNode;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeIndex> for Graph {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

impl Index<EdgeIndex> for Graph {
    type Output = GraphEdge;
    fn index(&self, index: EdgeIndex) -> &Self::Output {
        &self.edges[index.0]
    }
}

impl IndexMut<EdgeIndex> for Graph {
    fn index_mut(&mut self, index: EdgeIndex) -> &mut Self::Output {
        &mut self.edges[index.0]
    }
}
