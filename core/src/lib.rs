//! rabbit-graph-core: In-memory category similarity graph.
//!
//! A pure Rust library that freezes a category id set and an undirected
//! similarity relation into an adjacency-list snapshot, then answers:
//! shortest paths ("rabbit holes"), connected components ("rabbit
//! islands") and a double-BFS approximation of the diameter path ("the
//! longest rabbit hole").
//! No PostgreSQL dependencies — this crate compiles standalone.
//!
//! Results are category ids only; resolving names is up to the caller.

mod error;
mod graph;
mod islands;
mod snapshot;
mod traversal;

pub use error::GraphError;
pub use graph::{Graph, GraphBuilder, NodeId, SimilarityEdge};
pub use islands::{
    approximate_diameter_path, connected_components, farthest_from, largest_component, Farthest,
};
pub use snapshot::SharedGraph;
pub use traversal::{
    bfs_neighborhood, degree_centrality, shortest_path, DegreeResult, NeighborResult,
    TraversalResult,
};
