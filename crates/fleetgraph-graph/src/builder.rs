use crate::graph::{
    Graph, GraphEdge, GraphNode, GroupHeaderNode, NodeData, NodeIndex, ResourceNode, Vec2,
};
use crate::style::{edge_label_opacity, get_edge_style, get_header_colors, get_status_colors};
use fleetgraph_core::{EdgeId, EdgeKind, NodeId, Resource, ResourceKind, ResourceSet};

/// Turns a resource snapshot into nodes and reference edges.
///
/// Pure and stateless: every call creates a fresh graph with all positions at
/// the origin. Layout is a separate step.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    pub node_size: Vec2,
    pub header_size: Vec2,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(Vec2::new(
            Self::DEFAULT_NODE_WIDTH,
            Self::DEFAULT_NODE_HEIGHT,
        ))
    }
}

impl GraphBuilder {
    pub const DEFAULT_NODE_WIDTH: f32 = 220.0;
    pub const DEFAULT_NODE_HEIGHT: f32 = 72.0;
    const HEADER_HEIGHT: f32 = 32.0;

    pub fn new(node_size: Vec2) -> Self {
        Self {
            node_size,
            header_size: Vec2::new(node_size.x, Self::HEADER_HEIGHT),
        }
    }

    pub fn build(&self, resources: &ResourceSet) -> Graph {
        let mut graph = Graph::new();

        let mut member_counts = [0usize; 3];
        for kind in ResourceKind::ALL {
            for resource in resources.of_kind(kind) {
                let before = graph.node_count();
                graph.add_node(self.resource_node(resource));
                // Repeated identities collapse into one node and count once.
                if graph.node_count() > before {
                    member_counts[kind.index()] += 1;
                }
            }
        }

        for kind in ResourceKind::ALL {
            graph.add_node(self.header_node(kind, member_counts[kind.index()]));
        }

        for agent in &resources.agents {
            let agent_id = agent.node_id();

            if let Some(model_api) = &agent.model_api {
                let source = NodeId::resource(ResourceKind::ModelApi, &agent.namespace, model_api);
                Self::connect(&mut graph, EdgeKind::ProvidesModel, source, agent_id.clone());
            }

            for tool in &agent.tool_servers {
                let source = NodeId::resource(ResourceKind::ToolServer, &agent.namespace, tool);
                Self::connect(&mut graph, EdgeKind::ProvidesTool, source, agent_id.clone());
            }

            for peer in &agent.peer_agents {
                let target = NodeId::resource(ResourceKind::Agent, &agent.namespace, peer);
                if target == agent_id {
                    tracing::debug!("Ignoring self peer reference on {}", agent_id);
                    continue;
                }
                Self::connect(&mut graph, EdgeKind::PeerLink, agent_id.clone(), target);
            }
        }

        graph
    }

    fn resource_node(&self, resource: &Resource) -> GraphNode {
        GraphNode {
            id: resource.node_id(),
            kind: resource.kind,
            data: NodeData::Resource(ResourceNode {
                label: resource.name.clone(),
                namespace: resource.namespace.clone(),
                status: resource.status,
                status_message: resource.status_message.clone(),
            }),
            position: Vec2::default(),
            size: self.node_size,
            dimmed: false,
            highlighted: false,
            colors: get_status_colors(resource.status.bucket()),
        }
    }

    fn header_node(&self, kind: ResourceKind, member_count: usize) -> GraphNode {
        GraphNode {
            id: NodeId::header(kind),
            kind,
            data: NodeData::Header(GroupHeaderNode {
                label: kind.label().to_string(),
                member_count,
            }),
            position: Vec2::default(),
            size: self.header_size,
            dimmed: false,
            highlighted: false,
            colors: get_header_colors(kind, false),
        }
    }

    /// Emits an edge only when both endpoints resolve; dangling references
    /// are dropped.
    fn connect(graph: &mut Graph, kind: EdgeKind, source: NodeId, target: NodeId) {
        if graph.index_of(&source).is_none() || graph.index_of(&target).is_none() {
            tracing::debug!(
                "Dropping {} reference {} -> {}: endpoint not in snapshot",
                kind.label(),
                source,
                target
            );
            return;
        }

        let style = get_edge_style(kind);
        graph.add_edge(GraphEdge {
            id: EdgeId::new(kind, &source, &target),
            source,
            target,
            kind,
            label: kind.label().to_string(),
            style_class: style.class.to_string(),
            color: style.color,
            dimmed: false,
            animated: false,
            label_opacity: edge_label_opacity(false),
            source_idx: NodeIndex::default(),
            target_idx: NodeIndex::default(),
        });
    }
}
