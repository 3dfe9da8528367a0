use pgrx::prelude::*;
use rabbit_graph_core::NodeId;
use serde_json::{json, Value};

use crate::state::GraphState;

/// Map a SQL bigint onto a graph node id. Negative ids can never be
/// categories, so they map to None and the caller reports "not found".
pub fn to_node_id(id: i64) -> Option<NodeId> {
    NodeId::try_from(id).ok()
}

/// Validate that a depth/count parameter is non-negative.
/// Raises a PostgreSQL ERROR if negative.
pub fn check_non_negative(value: i32, param_name: &str) -> u32 {
    if value < 0 {
        error!(
            "rabbit_graph: {} must be non-negative, got {}",
            param_name, value
        );
    }
    value as u32
}

/// `[{id, name}, ...]` for a sequence of categories.
pub fn categories_json(gs: &GraphState, ids: &[NodeId]) -> Value {
    Value::Array(
        ids.iter()
            .map(|&id| json!({ "id": id, "name": gs.name(id) }))
            .collect(),
    )
}

/// One `(step, category_id, name)` row per category on a path.
pub fn path_rows(gs: &GraphState, path: &[NodeId]) -> Vec<(i32, i64, Option<String>)> {
    path.iter()
        .enumerate()
        .map(|(i, &id)| (i as i32, id as i64, gs.name(id)))
        .collect()
}
