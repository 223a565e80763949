use super::Layouter;
use super::ranking::assign_ranks;
use crate::graph::{Graph, NodeIndex, Vec2};
use crate::locks::PositionLocks;
use fleetgraph_core::LayoutDirection;
use std::collections::{BTreeMap, HashMap};

/// Layered drawing: longest-path ranks, barycenter ordering within each rank
/// to cut crossings, then size-aware coordinates.
#[derive(Debug, Clone, Copy)]
pub struct LayeredLayouter {
    /// Layout flow direction
    pub direction: LayoutDirection,
    /// Gap between consecutive ranks. `None` scales with graph size.
    pub layer_spacing: Option<f32>,
    /// Gap between nodes inside a rank. `None` scales with graph size.
    pub node_spacing: Option<f32>,
    /// Down/up sweeps of the barycenter heuristic
    pub barycenter_passes: usize,
}

#[derive(Default)]
struct Relations {
    incoming: HashMap<NodeIndex, Vec<NodeIndex>>,
    outgoing: HashMap<NodeIndex, Vec<NodeIndex>>,
}

type Layers = BTreeMap<usize, Vec<NodeIndex>>;

impl LayeredLayouter {
    pub const DEFAULT_BARYCENTER_PASSES: usize = 2;

    fn build_relations(graph: &Graph) -> Relations {
        let mut relations = Relations::default();
        for edge_idx in graph.edge_indices() {
            if let Some((source, target)) = graph.edge_endpoints(edge_idx) {
                relations.incoming.entry(target).or_default().push(source);
                relations.outgoing.entry(source).or_default().push(target);
            }
        }
        relations
    }

    fn build_layers(graph: &Graph, ranks: &HashMap<NodeIndex, usize>) -> Layers {
        let mut layers: Layers = BTreeMap::new();
        for (&node, &rank) in ranks {
            layers.entry(rank).or_default().push(node);
        }

        for nodes in layers.values_mut() {
            nodes.sort_by(|a, b| {
                graph[*a]
                    .label()
                    .cmp(graph[*b].label())
                    .then_with(|| graph[*a].id.cmp(&graph[*b].id))
            });
        }

        layers
    }

    fn spacing_for_node_count(node_count: usize) -> (f32, f32) {
        let tiny_graph = node_count <= 4;
        let small_graph = node_count <= 12;

        let layer_spacing = if tiny_graph {
            120.0
        } else if small_graph {
            160.0
        } else {
            300.0
        };
        let node_spacing = if tiny_graph {
            24.0
        } else if small_graph {
            40.0
        } else {
            80.0
        };

        (layer_spacing, node_spacing)
    }

    fn order_coords(layers: &Layers) -> HashMap<NodeIndex, f32> {
        let mut coords = HashMap::new();
        for layer_nodes in layers.values() {
            for (j, &node_idx) in layer_nodes.iter().enumerate() {
                coords.insert(node_idx, j as f32);
            }
        }
        coords
    }

    /// Mean order of `node`'s neighbors on the reference layer. A node with no
    /// placed neighbor keeps its own current order.
    fn barycenter(
        node: NodeIndex,
        coords: &HashMap<NodeIndex, f32>,
        neighbors: &HashMap<NodeIndex, Vec<NodeIndex>>,
    ) -> f32 {
        let placed: Vec<f32> = neighbors
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(|neighbor| coords.get(neighbor).copied())
            .collect();
        if placed.is_empty() {
            coords.get(&node).copied().unwrap_or(0.0)
        } else {
            placed.iter().sum::<f32>() / placed.len() as f32
        }
    }

    /// Reorders one layer by barycenter and records the new order in
    /// `coords`. Equal barycenters fall back to node id, so the result does
    /// not depend on the order the layer arrived in.
    fn reorder_layer(
        graph: &Graph,
        layer_nodes: &mut Vec<NodeIndex>,
        coords: &mut HashMap<NodeIndex, f32>,
        neighbors: &HashMap<NodeIndex, Vec<NodeIndex>>,
    ) {
        let mut keyed: Vec<(f32, NodeIndex)> = layer_nodes
            .iter()
            .map(|&idx| (Self::barycenter(idx, coords, neighbors), idx))
            .collect();
        keyed.sort_by(|(a_center, a), (b_center, b)| {
            a_center
                .total_cmp(b_center)
                .then_with(|| graph[*a].id.cmp(&graph[*b].id))
        });

        *layer_nodes = keyed.into_iter().map(|(_, idx)| idx).collect();
        for (order, &idx) in layer_nodes.iter().enumerate() {
            coords.insert(idx, order as f32);
        }
    }

    /// Alternating sweeps: each rank below the first is ordered against its
    /// predecessors, then each rank above the last against its successors.
    fn run_barycenter_passes(&self, graph: &Graph, layers: &mut Layers, relations: &Relations) {
        let ranks: Vec<usize> = layers.keys().copied().collect();
        let mut coords = Self::order_coords(layers);

        for _ in 0..self.barycenter_passes {
            for rank in ranks.iter().skip(1) {
                if let Some(layer_nodes) = layers.get_mut(rank) {
                    Self::reorder_layer(graph, layer_nodes, &mut coords, &relations.incoming);
                }
            }
            for rank in ranks.iter().rev().skip(1) {
                if let Some(layer_nodes) = layers.get_mut(rank) {
                    Self::reorder_layer(graph, layer_nodes, &mut coords, &relations.outgoing);
                }
            }
        }
    }

    /// Crossings between edges joining adjacent ranks. Edges spanning more
    /// than one rank are not counted.
    pub fn count_crossings(graph: &Graph, layers: &BTreeMap<usize, Vec<NodeIndex>>) -> usize {
        let mut rank_of = HashMap::new();
        let mut order_of = HashMap::new();
        for (&rank, nodes) in layers {
            for (j, &idx) in nodes.iter().enumerate() {
                rank_of.insert(idx, rank);
                order_of.insert(idx, j);
            }
        }

        let mut by_gap: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
        for edge_idx in graph.edge_indices() {
            let Some((source, target)) = graph.edge_endpoints(edge_idx) else {
                continue;
            };
            let (Some(&sr), Some(&tr)) = (rank_of.get(&source), rank_of.get(&target)) else {
                continue;
            };
            if tr == sr + 1 {
                by_gap
                    .entry(sr)
                    .or_default()
                    .push((order_of[&source], order_of[&target]));
            }
        }

        let mut crossings = 0;
        for segments in by_gap.values() {
            for (i, &(u1, v1)) in segments.iter().enumerate() {
                for &(u2, v2) in &segments[i + 1..] {
                    if (u1 < u2 && v1 > v2) || (u1 > u2 && v1 < v2) {
                        crossings += 1;
                    }
                }
            }
        }
        crossings
    }

    /// Ranks and within-rank order, before coordinates are assigned.
    pub fn ordered_layers(&self, graph: &Graph) -> BTreeMap<usize, Vec<NodeIndex>> {
        let ranks = assign_ranks(graph);
        let relations = Self::build_relations(graph);
        let mut layers = Self::build_layers(graph, &ranks);
        self.run_barycenter_passes(graph, &mut layers, &relations);
        layers
    }

    fn primary(&self, v: Vec2) -> f32 {
        match self.direction {
            LayoutDirection::Horizontal => v.x,
            LayoutDirection::Vertical => v.y,
        }
    }

    fn secondary(&self, v: Vec2) -> f32 {
        match self.direction {
            LayoutDirection::Horizontal => v.y,
            LayoutDirection::Vertical => v.x,
        }
    }

    fn point(&self, primary: f32, secondary: f32) -> Vec2 {
        match self.direction {
            LayoutDirection::Horizontal => Vec2::new(primary, secondary),
            LayoutDirection::Vertical => Vec2::new(secondary, primary),
        }
    }
}

impl Layouter for LayeredLayouter {
    fn execute(&self, graph: &Graph, locks: &PositionLocks) -> HashMap<NodeIndex, Vec2> {
        let mut positions = HashMap::new();
        let node_count = graph.resource_indices().count();
        if node_count == 0 {
            return positions;
        }

        let layers = self.ordered_layers(graph);
        tracing::debug!(
            "Layered ordering over {} ranks leaves {} crossings",
            layers.len(),
            Self::count_crossings(graph, &layers)
        );

        let (default_layer_spacing, default_node_spacing) =
            Self::spacing_for_node_count(node_count);
        let layer_spacing = self.layer_spacing.unwrap_or(default_layer_spacing);
        let node_spacing = self.node_spacing.unwrap_or(default_node_spacing);
        let rank_pitch = graph
            .resource_indices()
            .map(|idx| self.primary(graph[idx].size))
            .fold(0.0f32, f32::max)
            + layer_spacing;

        for (rank, layer_nodes) in layers {
            let free: Vec<NodeIndex> = layer_nodes
                .into_iter()
                .filter(|&idx| !locks.is_pinned(&graph[idx].id))
                .collect();

            let extent = free
                .iter()
                .map(|&idx| self.secondary(graph[idx].size))
                .sum::<f32>()
                + (free.len().saturating_sub(1) as f32) * node_spacing;
            let rank_pos = rank as f32 * rank_pitch;
            let mut current_offset = -extent / 2.0;

            for idx in free {
                positions.insert(idx, self.point(rank_pos, current_offset));
                current_offset += self.secondary(graph[idx].size) + node_spacing;
            }
        }

        positions
    }

    fn direction(&self) -> LayoutDirection {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use fleetgraph_core::{NodeId, Resource, ResourceKind, ResourceSet};

    fn layouter(direction: LayoutDirection) -> LayeredLayouter {
        LayeredLayouter {
            direction,
            layer_spacing: None,
            node_spacing: None,
            barycenter_passes: LayeredLayouter::DEFAULT_BARYCENTER_PASSES,
        }
    }

    /// a -> y and b -> x: label order alone crosses once.
    fn crossed() -> ResourceSet {
        let mut set = ResourceSet::new();
        set.push(Resource::new(ResourceKind::ModelApi, "default", "a"));
        set.push(Resource::new(ResourceKind::ModelApi, "default", "b"));
        set.push(Resource::new(ResourceKind::Agent, "default", "x").with_model_api("b"));
        set.push(Resource::new(ResourceKind::Agent, "default", "y").with_model_api("a"));
        set
    }

    fn id(kind: ResourceKind, name: &str) -> NodeId {
        NodeId::resource(kind, "default", name)
    }

    #[test]
    fn test_barycenter_removes_crossing() {
        let graph = GraphBuilder::default().build(&crossed());
        let ranks = assign_ranks(&graph);
        let unordered = LayeredLayouter::build_layers(&graph, &ranks);
        assert_eq!(LayeredLayouter::count_crossings(&graph, &unordered), 1);

        let ordered = layouter(LayoutDirection::Horizontal).ordered_layers(&graph);
        assert_eq!(LayeredLayouter::count_crossings(&graph, &ordered), 0);
    }

    #[test]
    fn test_horizontal_positions_follow_order() {
        let graph = GraphBuilder::default().build(&crossed());
        let positions =
            layouter(LayoutDirection::Horizontal).execute(&graph, &PositionLocks::new());

        let at = |kind, name| positions[&graph.index_of(&id(kind, name)).unwrap()];
        let x = at(ResourceKind::Agent, "x");
        let y = at(ResourceKind::Agent, "y");
        let a = at(ResourceKind::ModelApi, "a");

        assert!(x.x > a.x, "agents sit one rank to the right");
        assert_eq!(x.x, y.x);
        assert!(y.y < x.y, "y follows a, which is ordered first");
    }

    #[test]
    fn test_direction_changes_primary_axis() {
        let graph = GraphBuilder::default().build(&crossed());
        let v = layouter(LayoutDirection::Vertical).execute(&graph, &PositionLocks::new());
        let h = layouter(LayoutDirection::Horizontal).execute(&graph, &PositionLocks::new());

        let a = graph.index_of(&id(ResourceKind::ModelApi, "a")).unwrap();
        let x = graph.index_of(&id(ResourceKind::Agent, "x")).unwrap();

        assert!((v[&x].y - v[&a].y).abs() > 0.1);
        assert!((h[&x].x - h[&a].x).abs() > 0.1);
    }

    #[test]
    fn test_nodes_in_a_rank_do_not_overlap() {
        let mut set = ResourceSet::new();
        for i in 0..6 {
            set.push(Resource::new(ResourceKind::ToolServer, "default", &format!("tool-{i}")));
        }
        let graph = GraphBuilder::default().build(&set);
        let positions =
            layouter(LayoutDirection::Horizontal).execute(&graph, &PositionLocks::new());

        let mut ys: Vec<f32> = positions.values().map(|p| p.y).collect();
        ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in ys.windows(2) {
            assert!(pair[1] - pair[0] >= GraphBuilder::DEFAULT_NODE_HEIGHT);
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = GraphBuilder::default().build(&ResourceSet::new());
        assert!(
            layouter(LayoutDirection::Horizontal)
                .execute(&graph, &PositionLocks::new())
                .is_empty()
        );
    }

    #[test]
    fn test_ties_break_on_node_id() {
        // Both agents hang off the same API, so their barycenters tie.
        let mut set = ResourceSet::new();
        set.push(Resource::new(ResourceKind::ModelApi, "default", "api"));
        set.push(Resource::new(ResourceKind::Agent, "default", "b").with_model_api("api"));
        set.push(Resource::new(ResourceKind::Agent, "default", "a").with_model_api("api"));
        let graph = GraphBuilder::default().build(&set);

        let a = graph.index_of(&id(ResourceKind::Agent, "a")).unwrap();
        let b = graph.index_of(&id(ResourceKind::Agent, "b")).unwrap();
        let api = graph.index_of(&id(ResourceKind::ModelApi, "api")).unwrap();

        let mut coords = HashMap::from([(api, 0.0), (a, 1.0), (b, 0.0)]);
        let mut layer = vec![b, a];
        let relations = LayeredLayouter::build_relations(&graph);
        LayeredLayouter::reorder_layer(&graph, &mut layer, &mut coords, &relations.incoming);

        assert_eq!(layer, vec![a, b]);
        assert_eq!(coords[&a], 0.0);
        assert_eq!(coords[&b], 1.0);
    }

    #[test]
    fn test_unlinked_node_keeps_its_slot() {
        let mut set = ResourceSet::new();
        set.push(Resource::new(ResourceKind::ModelApi, "default", "api"));
        set.push(Resource::new(ResourceKind::Agent, "default", "lone"));
        let graph = GraphBuilder::default().build(&set);

        let lone = graph.index_of(&id(ResourceKind::Agent, "lone")).unwrap();
        let relations = LayeredLayouter::build_relations(&graph);
        let coords = HashMap::from([(lone, 3.0)]);
        assert_eq!(
            LayeredLayouter::barycenter(lone, &coords, &relations.incoming),
            3.0
        );
    }
}
