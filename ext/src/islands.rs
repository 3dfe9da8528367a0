use pgrx::prelude::*;

use crate::state;
use crate::util::{categories_json, check_non_negative, path_rows};

/// Connected groups of similar categories, in discovery order over the
/// category ids. Islands smaller than `min_size` are left out but keep
/// their number, so `island` is stable across different filters.
#[pg_extern]
fn rabbit_islands(
    min_size: default!(i32, 1),
) -> TableIterator<
    'static,
    (
        name!(island, i32),
        name!(size, i64),
        name!(categories, pgrx::JsonB),
    ),
> {
    crate::generation::ensure_fresh();
    let min_size = check_non_negative(min_size, "min_size") as usize;

    let rows = state::with_loaded_graph(|gs| {
        rabbit_graph_core::connected_components(&gs.graph)
            .into_iter()
            .enumerate()
            .filter(|(_, island)| island.len() >= min_size)
            .map(|(i, island)| {
                (
                    i as i32,
                    island.len() as i64,
                    pgrx::JsonB(categories_json(gs, &island)),
                )
            })
            .collect::<Vec<_>>()
    });

    TableIterator::new(rows)
}

/// An approximately longest chain of similar categories inside the largest
/// island. Zero rows when no categories are loaded.
#[pg_extern]
fn longest_rabbit_hole() -> TableIterator<
    'static,
    (
        name!(step, i32),
        name!(category_id, i64),
        name!(name, Option<String>),
    ),
> {
    crate::generation::ensure_fresh();

    let rows = state::with_loaded_graph(|gs| {
        let path = rabbit_graph_core::approximate_diameter_path(&gs.graph);
        path_rows(gs, &path)
    });

    TableIterator::new(rows)
}
