use pgrx::prelude::*;

use crate::state;
use crate::util::{check_non_negative, to_node_id};

#[pg_extern]
fn rabbit_graph_neighborhood(
    start_id: i64,
    max_depth: default!(i32, 3),
) -> TableIterator<
    'static,
    (
        name!(category_id, i64),
        name!(name, Option<String>),
        name!(distance, i32),
    ),
> {
    crate::generation::ensure_fresh();
    let depth = check_non_negative(max_depth, "max_depth");

    let results = state::with_loaded_graph(|gs| {
        let Some(start) = to_node_id(start_id) else {
            return Vec::new();
        };

        rabbit_graph_core::bfs_neighborhood(&gs.graph, start, depth)
            .neighbors
            .into_iter()
            .map(|nr| (nr.node_id as i64, gs.name(nr.node_id), nr.distance as i32))
            .collect::<Vec<_>>()
    });

    TableIterator::new(results)
}
