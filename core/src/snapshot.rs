use std::sync::Arc;

use parking_lot::RwLock;

use crate::graph::Graph;

/// A shareable handle to the current similarity graph.
///
/// Readers take an `Arc` to the snapshot and query it without holding the
/// lock. Refreshing builds a whole new [`Graph`] and swaps it in; snapshots
/// already handed out stay valid until their last reader drops them.
#[derive(Debug, Default)]
pub struct SharedGraph {
    current: RwLock<Arc<Graph>>,
}

impl SharedGraph {
    pub fn new(graph: Graph) -> Self {
        Self {
            current: RwLock::new(Arc::new(graph)),
        }
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<Graph> {
        Arc::clone(&self.current.read())
    }

    /// Publish a freshly built graph, returning the one it replaces.
    pub fn replace(&self, graph: Graph) -> Arc<Graph> {
        let next = Arc::new(graph);
        tracing::debug!(
            nodes = next.node_count(),
            edges = next.edge_count(),
            "similarity graph snapshot replaced"
        );
        std::mem::replace(&mut *self.current.write(), next)
    }
}
