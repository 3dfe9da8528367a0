//! Rabbit islands (connected components) and the longest rabbit hole
//! (double-BFS diameter approximation).

use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::{Graph, NodeId};

/// Outcome of a single BFS pass that tracks the farthest node reached.
#[derive(Debug, Clone)]
pub struct Farthest {
    pub node: NodeId,
    pub distance: u32,
    /// child → parent, pointing back toward the BFS start. The start has no entry.
    pub parents: HashMap<NodeId, NodeId>,
}

impl Farthest {
    /// Path from the BFS start to `self.node`, both ends included.
    pub fn path(&self) -> Vec<NodeId> {
        let mut path = vec![self.node];
        let mut current = self.node;
        while let Some(&parent) = self.parents.get(&current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}

/// Partition every node of `graph` into maximal connected islands.
///
/// Islands come out in the order their first node appears in
/// [`Graph::nodes`]; inside an island nodes are listed in DFS visit order.
/// Isolated categories form singleton islands.
pub fn connected_components(graph: &Graph) -> Vec<Vec<NodeId>> {
    let mut visited: HashSet<NodeId> = HashSet::with_capacity(graph.node_count());
    let mut islands = Vec::new();

    for &seed in graph.nodes() {
        if visited.contains(&seed) {
            continue;
        }

        let mut island = Vec::new();
        let mut stack = vec![seed];

        while let Some(node) = stack.pop() {
            // A node can sit on the stack more than once; the first pop wins.
            if !visited.insert(node) {
                continue;
            }
            island.push(node);
            stack.extend(
                graph
                    .neighbors(node)
                    .iter()
                    .copied()
                    .filter(|n| !visited.contains(n)),
            );
        }

        islands.push(island);
    }

    islands
}

/// The island with the most nodes. Ties go to the island found first.
pub fn largest_component(graph: &Graph) -> Option<Vec<NodeId>> {
    let mut largest: Option<Vec<NodeId>> = None;
    for island in connected_components(graph) {
        if largest.as_ref().map_or(true, |l| island.len() > l.len()) {
            largest = Some(island);
        }
    }
    largest
}

/// BFS from `start`, remembering the farthest node.
///
/// The farthest node only changes when a strictly greater distance is
/// dequeued, so among equally distant nodes the first one dequeued wins.
pub fn farthest_from(graph: &Graph, start: NodeId) -> Farthest {
    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<(NodeId, u32)> = VecDeque::new();

    let mut farthest = start;
    let mut max_distance = 0;

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((current, distance)) = queue.pop_front() {
        if distance > max_distance {
            max_distance = distance;
            farthest = current;
        }

        for &next in graph.neighbors(current) {
            if visited.insert(next) {
                parents.insert(next, current);
                queue.push_back((next, distance + 1));
            }
        }
    }

    Farthest {
        node: farthest,
        distance: max_distance,
        parents,
    }
}

/// Longest rabbit hole: a long shortest path inside the largest island.
///
/// Classic double BFS: from the island's first node A find the farthest B,
/// then from B find the farthest C, and return the BFS path B → C. Exact
/// on trees; on graphs with cycles it is a lower bound on the diameter.
/// Returns an empty path for an empty graph.
pub fn approximate_diameter_path(graph: &Graph) -> Vec<NodeId> {
    let Some(island) = largest_component(graph) else {
        return Vec::new();
    };

    let a = island[0];
    let b = farthest_from(graph, a).node;
    let c = farthest_from(graph, b);

    tracing::debug!(
        island_size = island.len(),
        from = b,
        to = c.node,
        hops = c.distance,
        "longest rabbit hole approximated"
    );

    c.path()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut island: Vec<NodeId>) -> Vec<NodeId> {
        island.sort_unstable();
        island
    }

    fn two_triangles() -> Graph {
        Graph::build(1..=6, [(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4)]).unwrap()
    }

    // --- Island tests ---

    #[test]
    fn test_islands_chain_plus_isolated() {
        let g = Graph::build([1, 2, 3, 4, 5], [(1, 2), (2, 3), (3, 4)]).unwrap();
        let islands = connected_components(&g);
        assert_eq!(islands.len(), 2);
        assert_eq!(sorted(islands[0].clone()), vec![1, 2, 3, 4]);
        assert_eq!(islands[1], vec![5]);
    }

    #[test]
    fn test_islands_single_node() {
        let g = Graph::build([1], []).unwrap();
        assert_eq!(connected_components(&g), vec![vec![1]]);
    }

    #[test]
    fn test_islands_empty_graph() {
        let g = Graph::default();
        assert!(connected_components(&g).is_empty());
        assert!(largest_component(&g).is_none());
    }

    #[test]
    fn test_islands_two_triangles() {
        let islands = connected_components(&two_triangles());
        assert_eq!(islands.len(), 2);
        assert_eq!(sorted(islands[0].clone()), vec![1, 2, 3]);
        assert_eq!(sorted(islands[1].clone()), vec![4, 5, 6]);
    }

    #[test]
    fn test_islands_dfs_visit_order() {
        // 1 has neighbors [2, 3]; the stack pops 3 first.
        let g = Graph::build([1, 2, 3, 4], [(1, 2), (1, 3), (2, 4)]).unwrap();
        assert_eq!(connected_components(&g), vec![vec![1, 3, 2, 4]]);
    }

    #[test]
    fn test_islands_follow_enumeration_order() {
        let g = Graph::build([9, 1, 5], [(1, 5)]).unwrap();
        let islands = connected_components(&g);
        assert_eq!(islands, vec![vec![9], vec![1, 5]]);
    }

    #[test]
    fn test_largest_island_tie_goes_to_first() {
        let g = Graph::build([10, 11, 20, 21], [(20, 21), (10, 11)]).unwrap();
        assert_eq!(largest_component(&g), Some(vec![10, 11]));
    }

    #[test]
    fn test_islands_cover_edge_only_nodes() {
        let g = Graph::build([1], [(2, 3)]).unwrap();
        let islands = connected_components(&g);
        assert_eq!(islands.len(), 2);
        assert_eq!(sorted(islands[1].clone()), vec![2, 3]);
    }

    // --- Farthest / diameter tests ---

    #[test]
    fn test_farthest_chain() {
        let g = Graph::build(0..5, (0..4).map(|i| (i, i + 1))).unwrap();
        let f = farthest_from(&g, 0);
        assert_eq!(f.node, 4);
        assert_eq!(f.distance, 4);
        assert_eq!(f.path(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_farthest_tie_keeps_first_dequeued() {
        // Star: every leaf is at distance 1; the first leaf dequeued wins.
        let g = Graph::build([0], [(0, 7), (0, 3), (0, 5)]).unwrap();
        let f = farthest_from(&g, 0);
        assert_eq!(f.node, 7);
        assert_eq!(f.distance, 1);
    }

    #[test]
    fn test_farthest_isolated() {
        let g = Graph::build([4], []).unwrap();
        let f = farthest_from(&g, 4);
        assert_eq!(f.node, 4);
        assert_eq!(f.distance, 0);
        assert_eq!(f.path(), vec![4]);
    }

    #[test]
    fn test_diameter_single_node() {
        let g = Graph::build([1], []).unwrap();
        assert_eq!(approximate_diameter_path(&g), vec![1]);
    }

    #[test]
    fn test_diameter_empty_graph() {
        assert!(approximate_diameter_path(&Graph::default()).is_empty());
    }

    #[test]
    fn test_diameter_chain_from_middle() {
        // Start node 2 is in the middle; the double BFS still finds the ends.
        let g = Graph::build([2, 0, 1, 3, 4], (0..4).map(|i| (i, i + 1))).unwrap();
        let path = approximate_diameter_path(&g);
        assert_eq!(path.len() - 1, 4);
        assert_eq!(path, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_diameter_tree_is_exact() {
        //        0
        //      / | \
        //     1  2  3
        //    /       \
        //   4         5
        //  /
        // 6
        let g = Graph::build(0..7, [(0, 1), (0, 2), (0, 3), (1, 4), (3, 5), (4, 6)]).unwrap();
        let path = approximate_diameter_path(&g);
        assert_eq!(path, vec![6, 4, 1, 0, 3, 5]);
    }

    #[test]
    fn test_diameter_two_triangles() {
        let path = approximate_diameter_path(&two_triangles());
        assert_eq!(path.len(), 2);
        assert!(path.iter().all(|n| (1..=3).contains(n)));
    }

    #[test]
    fn test_diameter_uses_largest_island() {
        let g = Graph::build(
            1..=8,
            [(1, 2), (3, 4), (4, 5), (5, 6), (6, 7)],
        )
        .unwrap();
        let path = approximate_diameter_path(&g);
        assert_eq!(path.len() - 1, 4);
        assert!(path.iter().all(|n| (3..=7).contains(n)));
    }

    #[test]
    fn test_diameter_path_is_connected() {
        let g = Graph::build(1..=5, [(1, 2), (2, 3), (3, 4), (4, 5), (5, 1)]).unwrap();
        let path = approximate_diameter_path(&g);
        assert_eq!(path.len() - 1, 2);
        for pair in path.windows(2) {
            assert!(g.neighbors(pair[0]).contains(&pair[1]));
        }
    }
}
