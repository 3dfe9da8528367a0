use pgrx::prelude::*;

use crate::state;
use crate::util::check_non_negative;

/// Categories with the most similar categories first. `top_n = 0` returns all.
#[pg_extern]
fn rabbit_graph_degree(
    top_n: default!(i32, 100),
) -> TableIterator<
    'static,
    (
        name!(category_id, i64),
        name!(name, Option<String>),
        name!(degree, i32),
    ),
> {
    crate::generation::ensure_fresh();
    let top_n = check_non_negative(top_n, "top_n") as usize;

    let results = state::with_loaded_graph(|gs| {
        rabbit_graph_core::degree_centrality(&gs.graph, top_n)
            .into_iter()
            .map(|dr| (dr.node_id as i64, gs.name(dr.node_id), dr.degree as i32))
            .collect::<Vec<_>>()
    });

    TableIterator::new(results)
}
