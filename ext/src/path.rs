use pgrx::prelude::*;
use rabbit_graph_core::NodeId;
use serde_json::json;

use crate::state::{self, GraphState};
use crate::util::{categories_json, path_rows, to_node_id};

/// Shortest chain of similar categories from `start_id` to `end_id`.
/// Zero rows when either id is unknown or the two sit on different islands.
#[pg_extern]
fn rabbit_hole(
    start_id: i64,
    end_id: i64,
) -> TableIterator<
    'static,
    (
        name!(step, i32),
        name!(category_id, i64),
        name!(name, Option<String>),
    ),
> {
    crate::generation::ensure_fresh();

    let rows = state::with_loaded_graph(|gs| {
        find_path(gs, start_id, end_id)
            .map(|path| path_rows(gs, &path))
            .unwrap_or_default()
    });

    TableIterator::new(rows)
}

/// Same as `rabbit_hole`, as one JSON document; NULL when there is no path.
#[pg_extern]
fn rabbit_hole_json(start_id: i64, end_id: i64) -> Option<pgrx::JsonB> {
    crate::generation::ensure_fresh();

    state::with_loaded_graph(|gs| {
        find_path(gs, start_id, end_id).map(|path| {
            pgrx::JsonB(json!({
                "start_id": start_id,
                "end_id": end_id,
                "length": path.len() - 1,
                "path": categories_json(gs, &path),
            }))
        })
    })
}

fn find_path(gs: &GraphState, start_id: i64, end_id: i64) -> Option<Vec<NodeId>> {
    let start = to_node_id(start_id).filter(|&id| gs.graph.contains(id))?;
    let end = to_node_id(end_id).filter(|&id| gs.graph.contains(id))?;
    rabbit_graph_core::shortest_path(&gs.graph, start, end)
}
