use super::Layouter;
use super::ranking::assign_ranks;
use crate::graph::{Graph, NodeIndex, Vec2};
use crate::locks::PositionLocks;
use std::collections::{BTreeMap, HashMap};

/// Columns by rank: `x = rank * column_spacing`, each column stacked
/// vertically and centered on `y = 0` in node order.
#[derive(Debug, Clone, Copy)]
pub struct RankLayouter {
    pub column_spacing: f32,
    pub node_height: f32,
    pub vertical_gap: f32,
}

impl RankLayouter {
    fn columns(graph: &Graph, locks: &PositionLocks) -> BTreeMap<usize, Vec<NodeIndex>> {
        let ranks = assign_ranks(graph);
        let mut columns: BTreeMap<usize, Vec<NodeIndex>> = BTreeMap::new();
        for idx in graph.resource_indices() {
            if locks.is_pinned(&graph[idx].id) {
                continue;
            }
            let rank = ranks.get(&idx).copied().unwrap_or(0);
            columns.entry(rank).or_default().push(idx);
        }
        columns
    }
}

impl Layouter for RankLayouter {
    fn execute(&self, graph: &Graph, locks: &PositionLocks) -> HashMap<NodeIndex, Vec2> {
        let mut positions = HashMap::new();

        for (rank, column) in Self::columns(graph, locks) {
            let count = column.len() as f32;
            let extent = count * self.node_height + (count - 1.0).max(0.0) * self.vertical_gap;
            let x = rank as f32 * self.column_spacing;
            let mut y = -extent / 2.0;

            for idx in column {
                positions.insert(idx, Vec2::new(x, y));
                y += self.node_height + self.vertical_gap;
            }
        }

        positions
    }
}
