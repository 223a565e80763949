use crate::graph::{Graph, NodeIndex};
use std::collections::{HashMap, VecDeque};

/// Longest-path-from-source ranks for resource nodes.
///
/// Nodes with no incoming edge seed rank 0 and ranks flow breadth-first along
/// edges, only ever increasing. A candidate rank is capped at `n - 1`, so a
/// cycle reachable from a seed stops climbing instead of looping forever.
/// Nodes never reached (isolated, or on a cycle with no seed) get rank 0.
pub fn assign_ranks(graph: &Graph) -> HashMap<NodeIndex, usize> {
    let resource_nodes: Vec<NodeIndex> = graph.resource_indices().collect();
    let max_rank = resource_nodes.len().saturating_sub(1);

    let mut in_degree: HashMap<NodeIndex, usize> =
        resource_nodes.iter().map(|&idx| (idx, 0)).collect();
    let mut outgoing: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();

    for edge_idx in graph.edge_indices() {
        let Some((source, target)) = graph.edge_endpoints(edge_idx) else {
            continue;
        };
        if !in_degree.contains_key(&source) {
            continue;
        }
        let Some(degree) = in_degree.get_mut(&target) else {
            continue;
        };
        *degree += 1;
        outgoing.entry(source).or_default().push(target);
    }

    let mut ranks: HashMap<NodeIndex, usize> = HashMap::with_capacity(resource_nodes.len());
    let mut queue = VecDeque::new();
    for &idx in &resource_nodes {
        if in_degree.get(&idx).copied() == Some(0) {
            ranks.insert(idx, 0);
            queue.push_back(idx);
        }
    }

    let mut capped = false;
    while let Some(node) = queue.pop_front() {
        let rank = ranks.get(&node).copied().unwrap_or(0);
        let Some(targets) = outgoing.get(&node) else {
            continue;
        };
        for &next in targets {
            let candidate = rank + 1;
            if candidate > max_rank {
                capped = true;
                continue;
            }
            if ranks.get(&next).is_some_and(|&current| current >= candidate) {
                continue;
            }
            ranks.insert(next, candidate);
            queue.push_back(next);
        }
    }

    if capped {
        tracing::warn!(
            "Rank propagation reached its bound of {}; input contains a cycle",
            max_rank
        );
    }

    for idx in resource_nodes {
        ranks.entry(idx).or_insert(0);
    }
    ranks
}
