use std::collections::{HashMap, HashSet};

use crate::error::GraphError;

/// Category identifier (the primary key of the category table in production).
pub type NodeId = u64;

/// An undirected "similar to" relation between two distinct categories.
///
/// Endpoints keep the order they were supplied in; equality and hashing
/// are over the unordered pair.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEdge {
    a: NodeId,
    b: NodeId,
}

impl SimilarityEdge {
    pub fn new(a: NodeId, b: NodeId) -> Result<Self, GraphError> {
        if a == b {
            return Err(GraphError::SelfEdge(a));
        }
        Ok(Self { a, b })
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    /// Canonical `(min, max)` form used for deduplication.
    pub fn key(&self) -> (NodeId, NodeId) {
        (self.a.min(self.b), self.a.max(self.b))
    }
}

impl PartialEq for SimilarityEdge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SimilarityEdge {}

impl std::hash::Hash for SimilarityEdge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Accumulates categories and similarity pairs, then freezes them into a [`Graph`].
///
/// Declared nodes keep the order they were declared in. Nodes that only
/// show up as edge endpoints are appended after them, in the order they
/// were first seen.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    declared: Vec<NodeId>,
    declared_set: HashSet<NodeId>,
    discovered: Vec<NodeId>,
    seen_pairs: HashSet<SimilarityEdge>,
    duplicate_edges: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known catalog size.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            adjacency: HashMap::with_capacity(node_count),
            declared: Vec::with_capacity(node_count),
            declared_set: HashSet::with_capacity(node_count),
            discovered: Vec::new(),
            seen_pairs: HashSet::with_capacity(edge_count),
            duplicate_edges: 0,
        }
    }

    /// Declare a category. Returns false if it was already declared.
    pub fn add_node(&mut self, id: NodeId) -> bool {
        if !self.declared_set.insert(id) {
            return false;
        }
        self.declared.push(id);
        true
    }

    /// Add an undirected similarity pair.
    ///
    /// Returns `Ok(false)` when the unordered pair was already added; the
    /// adjacency lists are left untouched in that case.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        self.insert(SimilarityEdge::new(a, b)?)
    }

    pub fn insert(&mut self, edge: SimilarityEdge) -> Result<bool, GraphError> {
        if !self.seen_pairs.insert(edge) {
            self.duplicate_edges += 1;
            return Ok(false);
        }

        let (a, b) = edge.endpoints();
        self.neighbors_mut(a).push(b);
        self.neighbors_mut(b).push(a);
        Ok(true)
    }

    fn neighbors_mut(&mut self, id: NodeId) -> &mut Vec<NodeId> {
        let discovered = &mut self.discovered;
        self.adjacency.entry(id).or_insert_with(|| {
            discovered.push(id);
            Vec::new()
        })
    }

    /// Distinct similarity pairs accepted so far.
    pub fn edge_count(&self) -> usize {
        self.seen_pairs.len()
    }

    /// Pairs dropped because the same unordered pair was already present.
    pub fn duplicate_edges(&self) -> usize {
        self.duplicate_edges
    }

    pub fn build(self) -> Graph {
        let GraphBuilder {
            mut adjacency,
            declared,
            declared_set,
            discovered,
            seen_pairs,
            duplicate_edges,
        } = self;

        let mut nodes = declared;
        nodes.extend(discovered.into_iter().filter(|id| !declared_set.contains(id)));

        // Isolated categories still get an (empty) entry.
        for &id in &nodes {
            adjacency.entry(id).or_default();
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = seen_pairs.len(),
            duplicate_edges,
            "similarity graph built"
        );

        Graph {
            adjacency,
            nodes,
            edge_count: seen_pairs.len(),
        }
    }
}

/// Immutable snapshot of the similarity relation: undirected adjacency lists
/// plus a fixed node enumeration order.
///
/// Neighbor lists are in edge discovery order. Every query that depends on
/// iteration order (islands, the largest-island tie-break, the diameter
/// start node) follows [`Graph::nodes`].
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    nodes: Vec<NodeId>,
    edge_count: usize,
}

impl Graph {
    /// Build a snapshot from the full category id set and the full list of
    /// similarity pairs.
    ///
    /// `node_ids` is a completeness floor: an edge endpoint missing from it
    /// still becomes a node. Fails on the first self-pair.
    pub fn build<N, E>(node_ids: N, edges: E) -> Result<Self, GraphError>
    where
        N: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut builder = GraphBuilder::new();
        for id in node_ids {
            builder.add_node(id);
        }
        for (a, b) in edges {
            builder.add_edge(a, b)?;
        }
        Ok(builder.build())
    }

    /// Neighbors of `id` in discovery order. Unknown ids have none.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// All nodes in enumeration order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Distinct undirected similarity pairs.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        // Per-entry overhead of the map: key, Vec header, hashbrown control bytes.
        let map_mem = self.adjacency.capacity()
            * (size_of::<NodeId>() + size_of::<Vec<NodeId>>() + 1);
        let list_mem: usize = self
            .adjacency
            .values()
            .map(|v| v.capacity() * size_of::<NodeId>())
            .sum();
        let order_mem = self.nodes.capacity() * size_of::<NodeId>();

        map_mem + list_mem + order_mem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_symmetric() {
        let g = Graph::build([1, 2, 3], [(1, 2), (3, 2)]).unwrap();
        assert_eq!(g.neighbors(1), &[2]);
        assert_eq!(g.neighbors(2), &[1, 3]);
        assert_eq!(g.neighbors(3), &[2]);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_isolated_nodes_have_entries() {
        let g = Graph::build([1, 2, 5], [(1, 2)]).unwrap();
        assert!(g.contains(5));
        assert!(g.neighbors(5).is_empty());
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn test_edge_only_nodes_are_kept() {
        let g = Graph::build([1], [(1, 7)]).unwrap();
        assert!(g.contains(7));
        assert_eq!(g.neighbors(7), &[1]);
        assert_eq!(g.nodes(), &[1, 7]);
    }

    #[test]
    fn test_enumeration_follows_declaration_order() {
        let g = Graph::build([9, 3, 5, 3], [(5, 3), (9, 42), (11, 3)]).unwrap();
        assert_eq!(g.nodes(), &[9, 3, 5, 42, 11]);
    }

    #[test]
    fn test_self_edge_rejected() {
        let err = Graph::build([1, 2], [(1, 2), (2, 2)]).unwrap_err();
        assert_eq!(err, GraphError::SelfEdge(2));
        assert_eq!(err.to_string(), "category 2 cannot be similar to itself");
    }

    #[test]
    fn test_builder_self_edge_leaves_state_untouched() {
        let mut b = GraphBuilder::new();
        b.add_node(4);
        assert!(b.add_edge(4, 4).is_err());
        let g = b.build();
        assert_eq!(g.edge_count(), 0);
        assert!(g.neighbors(4).is_empty());
    }

    #[test]
    fn test_duplicate_pairs_deduplicated() {
        let mut b = GraphBuilder::new();
        assert_eq!(b.add_edge(1, 2), Ok(true));
        assert_eq!(b.add_edge(2, 1), Ok(false));
        assert_eq!(b.add_edge(1, 2), Ok(false));
        assert_eq!(b.edge_count(), 1);
        assert_eq!(b.duplicate_edges(), 2);

        let g = b.build();
        assert_eq!(g.neighbors(1), &[2]);
        assert_eq!(g.neighbors(2), &[1]);
    }

    #[test]
    fn test_similarity_edge_unordered_equality() {
        let e1 = SimilarityEdge::new(3, 8).unwrap();
        let e2 = SimilarityEdge::new(8, 3).unwrap();
        assert_eq!(e1, e2);
        assert_eq!(e1.key(), (3, 8));
        assert_eq!(e2.endpoints(), (8, 3));
    }

    #[test]
    fn test_empty_graph() {
        let g = Graph::build(Vec::new(), Vec::new()).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.neighbors(1).is_empty());
        assert!(!g.contains(1));
    }

    #[test]
    fn test_memory_usage_nonzero() {
        let g = Graph::build(0..100, (1..100).map(|i| (0, i))).unwrap();
        assert!(g.memory_usage() > 0);
        assert_eq!(g.degree(0), 99);
    }
}
