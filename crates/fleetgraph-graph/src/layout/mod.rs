//! Node placement.
//!
//! A [`Layouter`] proposes positions for the free resource nodes. [`layout_graph`]
//! then applies them, restores pinned positions verbatim, pushes free nodes off
//! any pinned box they landed on, and anchors the group headers.

use crate::graph::{Graph, NodeIndex, Vec2};
use crate::locks::PositionLocks;
use fleetgraph_core::{LayoutDirection, NodeId, ResourceKind};
use std::collections::HashMap;

pub mod layered;
pub mod rank;
pub mod ranking;

pub use layered::LayeredLayouter;
pub use rank::RankLayouter;
pub use ranking::assign_ranks;

pub trait Layouter {
    /// Positions for resource nodes that are not pinned in `locks`.
    ///
    /// Pinned nodes still take part in ranking so their neighbours line up
    /// with them, but they must not be moved.
    fn execute(&self, graph: &Graph, locks: &PositionLocks) -> HashMap<NodeIndex, Vec2>;

    /// Axis along which ranks advance.
    fn direction(&self) -> LayoutDirection {
        LayoutDirection::Horizontal
    }
}

/// Where group headers go relative to their members.
#[derive(Debug, Clone, Copy)]
pub struct HeaderPlacement {
    /// Distance above the topmost member.
    pub offset: f32,
    /// Column pitch used for a kind that has no members.
    pub column_spacing: f32,
    /// Gap kept between a pinned node and a free node pushed off it.
    pub gap: f32,
}

pub fn layout_graph(
    layouter: &dyn Layouter,
    graph: &mut Graph,
    locks: &PositionLocks,
    headers: &HeaderPlacement,
) {
    let proposed = layouter.execute(graph, locks);
    let indices: Vec<NodeIndex> = graph.resource_indices().collect();
    for idx in indices {
        let node = &mut graph[idx];
        node.position = locks
            .get(&node.id)
            .or_else(|| proposed.get(&idx).copied())
            .unwrap_or_default();
    }

    resolve_pinned_overlaps(graph, locks, layouter.direction(), headers.gap);
    place_headers(graph, headers);
}

fn overlaps(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && b_pos.x < a_pos.x + a_size.x
        && a_pos.y < b_pos.y + b_size.y
        && b_pos.y < a_pos.y + a_size.y
}

/// Slides free nodes along the within-rank axis until they clear every pinned
/// box and every free node already settled.
fn resolve_pinned_overlaps(
    graph: &mut Graph,
    locks: &PositionLocks,
    direction: LayoutDirection,
    gap: f32,
) {
    let mut occupied: Vec<(Vec2, Vec2)> = graph
        .resource_indices()
        .filter(|&idx| locks.is_pinned(&graph[idx].id))
        .map(|idx| (graph[idx].position, graph[idx].size))
        .collect();
    if occupied.is_empty() {
        return;
    }

    let secondary = |p: Vec2| match direction {
        LayoutDirection::Horizontal => (p.x, p.y),
        LayoutDirection::Vertical => (p.y, p.x),
    };

    let mut free: Vec<NodeIndex> = graph
        .resource_indices()
        .filter(|&idx| !locks.is_pinned(&graph[idx].id))
        .collect();
    free.sort_by(|a, b| {
        secondary(graph[*a].position)
            .partial_cmp(&secondary(graph[*b].position))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for idx in free {
        let size = graph[idx].size;
        let mut pos = graph[idx].position;
        // The node only moves forward, so each box can be passed at most once.
        for _ in 0..=occupied.len() {
            let Some(&(box_pos, box_size)) = occupied
                .iter()
                .find(|(box_pos, box_size)| overlaps(pos, size, *box_pos, *box_size))
            else {
                break;
            };
            match direction {
                LayoutDirection::Horizontal => pos.y = box_pos.y + box_size.y + gap,
                LayoutDirection::Vertical => pos.x = box_pos.x + box_size.x + gap,
            }
        }
        graph[idx].position = pos;
        occupied.push((pos, size));
    }
}

/// Puts each header above the topmost member of its kind.
pub fn place_headers(graph: &mut Graph, placement: &HeaderPlacement) {
    for kind in ResourceKind::ALL {
        let Some(header_idx) = graph.index_of(&NodeId::header(kind)) else {
            continue;
        };

        let mut topmost: Option<Vec2> = None;
        for idx in graph.resource_indices() {
            let node = &graph[idx];
            if node.kind != kind {
                continue;
            }
            if topmost.is_none_or(|top| node.position.y < top.y) {
                topmost = Some(node.position);
            }
        }

        graph[header_idx].position = match topmost {
            Some(top) => Vec2::new(top.x, top.y - placement.offset),
            None => Vec2::new(
                kind.index() as f32 * placement.column_spacing,
                -placement.offset,
            ),
        };
    }
}
