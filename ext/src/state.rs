use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Instant;

use rabbit_graph_core::{Graph, NodeId};

/// The loaded similarity graph plus what callers need to present results.
pub struct GraphState {
    pub graph: Graph,
    /// Category id → display name. The core only deals in ids.
    pub names: HashMap<NodeId, String>,
    pub category_table: String,
    /// Similarity table the graph was read from; also the generation key.
    pub source: String,
    pub self_edges_skipped: usize,
    pub duplicate_edges_skipped: usize,
    pub load_time_ms: f64,
    pub loaded_at: Instant,
    /// Generation counter at time of load. 0 = loaded before any invalidation.
    pub loaded_generation: i64,
}

impl GraphState {
    pub fn name(&self, id: NodeId) -> Option<String> {
        self.names.get(&id).cloned()
    }
}

thread_local! {
    /// Per-backend graph state.
    ///
    /// PostgreSQL backends are single-threaded, so thread_local! + RefCell
    /// is safe. Each connection loads its own snapshot and replaces it
    /// wholesale on reload.
    static GRAPH_STATE: RefCell<Option<GraphState>> = const { RefCell::new(None) };
}

/// Execute a closure with a read reference to the loaded graph.
/// Returns None if no graph is loaded.
pub fn with_graph<R, F: FnOnce(&GraphState) -> R>(f: F) -> Option<R> {
    GRAPH_STATE.with(|cell| {
        let borrow = cell.borrow();
        borrow.as_ref().map(f)
    })
}

/// Like [`with_graph`], but raises an ERROR when nothing is loaded.
pub fn with_loaded_graph<R, F: FnOnce(&GraphState) -> R>(f: F) -> R {
    with_graph(f).unwrap_or_else(|| {
        pgrx::error!("rabbit_graph: no graph loaded — call rabbit_graph_load() first");
    })
}

/// Replace the per-backend graph state.
pub fn set_graph(state: GraphState) {
    GRAPH_STATE.with(|cell| {
        *cell.borrow_mut() = Some(state);
    });
}
