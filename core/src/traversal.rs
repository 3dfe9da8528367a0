use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::{Graph, NodeId};

/// A category found during BFS neighborhood traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborResult {
    pub node_id: NodeId,
    pub distance: u32,
}

/// Result of a neighborhood traversal.
#[derive(Debug)]
pub struct TraversalResult {
    pub neighbors: Vec<NeighborResult>,
    pub nodes_visited: usize,
}

/// Number of similar categories for a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeResult {
    pub node_id: NodeId,
    pub degree: u32,
}

/// BFS neighborhood: every category reachable from `start` within `max_depth` hops.
///
/// Each node is reported once, at its minimum distance, in BFS discovery
/// order. The start node itself is counted in `nodes_visited` but not
/// listed.
pub fn bfs_neighborhood(graph: &Graph, start: NodeId, max_depth: u32) -> TraversalResult {
    if !graph.contains(start) {
        return TraversalResult {
            neighbors: Vec::new(),
            nodes_visited: 0,
        };
    }

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<(NodeId, u32)> = VecDeque::new();
    let mut neighbors = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for &next in graph.neighbors(current) {
            if visited.insert(next) {
                neighbors.push(NeighborResult {
                    node_id: next,
                    distance: depth + 1,
                });
                queue.push_back((next, depth + 1));
            }
        }
    }

    TraversalResult {
        neighbors,
        nodes_visited: visited.len(),
    }
}

/// Shortest rabbit hole from `start` to `end`, by edge count.
///
/// Returns `Some(vec![start])` when `start == end`, without looking at the
/// graph. Returns `None` when no path exists, which includes either id being
/// unknown. The path includes both endpoints.
///
/// BFS stops the moment `end` appears in a neighbor list, so among several
/// shortest paths the one returned is decided by neighbor-list order.
pub fn shortest_path(graph: &Graph, start: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
    if start == end {
        return Some(vec![start]);
    }

    // child → the node that discovered it; start has no entry.
    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for &next in graph.neighbors(current) {
            if next == end {
                let mut path = vec![end];
                let mut node = current;
                path.push(node);
                while let Some(&parent) = parents.get(&node) {
                    path.push(parent);
                    node = parent;
                }
                path.reverse();
                tracing::trace!(start, end, hops = path.len() - 1, "rabbit hole found");
                return Some(path);
            }

            if visited.insert(next) {
                parents.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    tracing::trace!(start, end, visited = visited.len(), "no rabbit hole");
    None
}

/// Return categories ranked by how many similar categories they have.
///
/// If `top_n` is 0, returns all nodes. Otherwise returns the top N by
/// degree (descending). Ties are broken by node ID (ascending).
pub fn degree_centrality(graph: &Graph, top_n: usize) -> Vec<DegreeResult> {
    let mut results: Vec<DegreeResult> = graph
        .nodes()
        .iter()
        .map(|&id| DegreeResult {
            node_id: id,
            degree: graph.degree(id) as u32,
        })
        .collect();

    results.sort_by(|a, b| b.degree.cmp(&a.degree).then(a.node_id.cmp(&b.node_id)));

    if top_n > 0 && top_n < results.len() {
        results.truncate(top_n);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chain(n: u64) -> Graph {
        Graph::build(0..n, (0..n - 1).map(|i| (i, i + 1))).unwrap()
    }

    fn make_star(center: u64, leaves: u64) -> Graph {
        Graph::build([center], (1..=leaves).map(|i| (center, center + i))).unwrap()
    }

    fn make_cycle(n: u64) -> Graph {
        Graph::build(0..n, (0..n).map(|i| (i, (i + 1) % n))).unwrap()
    }

    // --- Neighborhood tests ---

    #[test]
    fn test_bfs_chain() {
        let g = make_chain(6);
        let result = bfs_neighborhood(&g, 0, 10);
        assert_eq!(result.neighbors.len(), 5);
        let node5 = result.neighbors.iter().find(|n| n.node_id == 5).unwrap();
        assert_eq!(node5.distance, 5);
    }

    #[test]
    fn test_bfs_chain_depth_limited() {
        let g = make_chain(10);
        let result = bfs_neighborhood(&g, 0, 3);
        assert_eq!(result.neighbors.len(), 3);
        assert!(result.neighbors.iter().all(|n| n.distance <= 3));
    }

    #[test]
    fn test_bfs_star() {
        let g = make_star(0, 100);
        let result = bfs_neighborhood(&g, 0, 1);
        assert_eq!(result.neighbors.len(), 100);
        assert!(result.neighbors.iter().all(|n| n.distance == 1));
    }

    #[test]
    fn test_bfs_cycle_no_infinite_loop() {
        let g = make_cycle(5);
        let result = bfs_neighborhood(&g, 0, 100);
        assert_eq!(result.neighbors.len(), 4);
        assert!(result.neighbors.iter().all(|n| n.distance <= 2));
    }

    #[test]
    fn test_bfs_is_undirected() {
        let g = make_chain(2);
        let result = bfs_neighborhood(&g, 1, 1);
        assert_eq!(result.neighbors, vec![NeighborResult { node_id: 0, distance: 1 }]);
    }

    #[test]
    fn test_bfs_start_not_in_graph() {
        let g = make_chain(3);
        let result = bfs_neighborhood(&g, 999, 10);
        assert!(result.neighbors.is_empty());
        assert_eq!(result.nodes_visited, 0);
    }

    #[test]
    fn test_bfs_depth_zero() {
        let g = make_chain(5);
        let result = bfs_neighborhood(&g, 0, 0);
        assert!(result.neighbors.is_empty());
        assert_eq!(result.nodes_visited, 1);
    }

    #[test]
    fn test_bfs_isolated_start() {
        let g = Graph::build([1, 2], []).unwrap();
        let result = bfs_neighborhood(&g, 1, 5);
        assert!(result.neighbors.is_empty());
        assert_eq!(result.nodes_visited, 1);
    }

    // --- Rabbit hole tests ---

    #[test]
    fn test_shortest_path_chain() {
        let g = make_chain(6);
        let path = shortest_path(&g, 0, 5).unwrap();
        assert_eq!(path, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_shortest_path_reverse_direction() {
        let g = make_chain(4);
        assert_eq!(shortest_path(&g, 3, 0).unwrap(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_shortest_path_adjacent() {
        let g = make_chain(3);
        assert_eq!(shortest_path(&g, 0, 1).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_shortest_path_self() {
        let g = make_chain(3);
        assert_eq!(shortest_path(&g, 1, 1), Some(vec![1]));
    }

    #[test]
    fn test_shortest_path_self_needs_no_traversal() {
        let g = Graph::default();
        assert_eq!(shortest_path(&g, 42, 42), Some(vec![42]));
    }

    #[test]
    fn test_shortest_path_no_path() {
        let g = Graph::build([0, 1], []).unwrap();
        assert!(shortest_path(&g, 0, 1).is_none());
    }

    #[test]
    fn test_shortest_path_disconnected_is_not_zero_length() {
        let g = Graph::build([1, 2, 3, 4, 5], [(1, 2), (2, 3), (3, 4)]).unwrap();
        assert_eq!(shortest_path(&g, 1, 4), Some(vec![1, 2, 3, 4]));
        assert_eq!(shortest_path(&g, 1, 5), None);
        assert_eq!(shortest_path(&g, 5, 5), Some(vec![5]));
    }

    #[test]
    fn test_shortest_path_cycle_takes_short_way() {
        // 1-2-3-4-5-1
        let g = Graph::build(1..=5, [(1, 2), (2, 3), (3, 4), (4, 5), (5, 1)]).unwrap();
        assert_eq!(shortest_path(&g, 1, 2).unwrap().len() - 1, 1);
        assert_eq!(shortest_path(&g, 1, 5).unwrap().len() - 1, 1);
        assert_eq!(shortest_path(&g, 1, 3).unwrap(), vec![1, 2, 3]);
        assert_eq!(shortest_path(&g, 1, 4).unwrap(), vec![1, 5, 4]);
        assert_eq!(shortest_path(&g, 2, 5).unwrap().len() - 1, 2);
    }

    #[test]
    fn test_shortest_path_even_cycle() {
        let g = make_cycle(6);
        let path = shortest_path(&g, 0, 3).unwrap();
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_shortest_path_tie_break_follows_edge_order() {
        // Diamond: 0-1-3 and 0-2-3, edge (0,1) inserted first.
        let g = Graph::build(0..4, [(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        assert_eq!(shortest_path(&g, 0, 3).unwrap(), vec![0, 1, 3]);

        let g = Graph::build(0..4, [(0, 2), (0, 1), (2, 3), (1, 3)]).unwrap();
        assert_eq!(shortest_path(&g, 0, 3).unwrap(), vec![0, 2, 3]);
    }

    #[test]
    fn test_shortest_path_start_not_in_graph() {
        let g = make_chain(3);
        assert!(shortest_path(&g, 999, 0).is_none());
    }

    #[test]
    fn test_shortest_path_target_not_in_graph() {
        let g = make_chain(3);
        assert!(shortest_path(&g, 0, 999).is_none());
    }

    #[test]
    fn test_shortest_path_is_simple() {
        let g = make_cycle(9);
        let path = shortest_path(&g, 0, 4).unwrap();
        let unique: HashSet<_> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
        assert_eq!(path.len() - 1, 4);
    }

    // --- Degree tests ---

    #[test]
    fn test_degree_star() {
        let g = make_star(0, 5);
        let result = degree_centrality(&g, 0);
        assert_eq!(result.len(), 6);
        assert_eq!(result[0], DegreeResult { node_id: 0, degree: 5 });
        assert!(result[1..].iter().all(|d| d.degree == 1));
    }

    #[test]
    fn test_degree_sorted_with_id_tie_break() {
        let g = make_chain(4);
        let result = degree_centrality(&g, 0);
        let ids: Vec<NodeId> = result.iter().map(|d| d.node_id).collect();
        assert_eq!(ids, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_degree_top_n() {
        let g = make_star(0, 50);
        let result = degree_centrality(&g, 3);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].node_id, 0);
    }

    #[test]
    fn test_degree_includes_isolated() {
        let g = Graph::build([1, 2, 3], [(1, 2)]).unwrap();
        let result = degree_centrality(&g, 0);
        assert_eq!(result.last(), Some(&DegreeResult { node_id: 3, degree: 0 }));
    }

    #[test]
    fn test_degree_empty() {
        let g = Graph::default();
        assert!(degree_centrality(&g, 10).is_empty());
    }
}
