//! Generation-based cache invalidation for rabbit_graph.
//!
//! A monotonic generation counter per similarity table tracks edits to the
//! category catalog. Query functions compare the loaded generation against
//! the current value and optionally auto-reload when stale.
//!
//! Applications call `rabbit_graph_invalidate()` after creating, editing or
//! linking categories. This bumps the counter and fires
//! `pg_notify('rabbit_graph', source)` so other listeners can react.

use pgrx::prelude::*;
use pgrx::spi::quote_literal;

use crate::guc;
use crate::state;

// ---------------------------------------------------------------------------
// Bootstrap SQL: schema + generation table, created at CREATE EXTENSION time.
// ---------------------------------------------------------------------------

extension_sql!(
    r#"
CREATE SCHEMA IF NOT EXISTS rabbit_graph;

CREATE TABLE rabbit_graph.generation (
    source      text PRIMARY KEY,
    generation  bigint NOT NULL DEFAULT 1,
    updated_at  timestamptz NOT NULL DEFAULT now()
);

COMMENT ON TABLE rabbit_graph.generation IS
    'Monotonic generation counter for rabbit_graph cache invalidation. '
    'Call rabbit_graph_invalidate() after editing categories or similarity pairs.';
"#,
    name = "bootstrap",
    bootstrap
);

// ---------------------------------------------------------------------------
// Generation reads
// ---------------------------------------------------------------------------

/// Read the current generation within an existing SPI connection.
/// Returns None if the table is inaccessible; Some(0) if no row exists.
pub fn fetch_generation_spi(client: &pgrx::spi::SpiClient<'_>, source: &str) -> Option<i64> {
    let query = format!(
        "SELECT generation FROM rabbit_graph.generation WHERE source = {}",
        quote_literal(source)
    );
    match client.select(&query, None, &[]) {
        Ok(table) => {
            if let Some(row) = table.into_iter().next() {
                return row
                    .get_by_name::<i64, _>("generation")
                    .ok()
                    .flatten()
                    .or(Some(0));
            }
            Some(0) // No row = never invalidated
        }
        Err(_) => {
            warning!("rabbit_graph: cannot read generation table, skipping staleness check");
            None
        }
    }
}

/// Read the current generation in a standalone SPI connection.
pub fn fetch_generation(source: &str) -> Option<i64> {
    Spi::connect(|client| {
        Ok::<_, pgrx::spi::SpiError>(fetch_generation_spi(&client, source))
    })
    .unwrap_or(None)
}

// ---------------------------------------------------------------------------
// Invalidation
// ---------------------------------------------------------------------------

/// Bump the generation counter for a similarity table and notify listeners.
///
/// `source` defaults to `rabbit_graph.similarity_table`. Returns the new
/// generation number; creates the row on first call.
#[pg_extern]
fn rabbit_graph_invalidate(source: default!(Option<String>, "NULL")) -> i64 {
    let source = source
        .or_else(|| guc::get_string(&guc::SIMILARITY_TABLE))
        .unwrap_or_else(|| {
            error!("rabbit_graph: similarity_table not set and no source argument provided");
        });
    crate::load::validate_name(&source);

    Spi::connect_mut(|client| {
        let upsert = format!(
            "INSERT INTO rabbit_graph.generation (source, generation, updated_at) \
             VALUES ({}, 1, now()) \
             ON CONFLICT (source) \
             DO UPDATE SET generation = rabbit_graph.generation.generation + 1, \
                           updated_at = now() \
             RETURNING generation",
            quote_literal(&source)
        );

        let new_gen: i64 = client
            .update(&upsert, None, &[])?
            .first()
            .get_one::<i64>()?
            .unwrap_or(1);

        client.update(
            &format!(
                "SELECT pg_notify('rabbit_graph', {})",
                quote_literal(&source)
            ),
            None,
            &[],
        )?;

        Ok::<_, pgrx::spi::SpiError>(new_gen)
    })
    .unwrap_or_else(|e| {
        error!("rabbit_graph_invalidate: {}", e);
    })
}

// ---------------------------------------------------------------------------
// Staleness check + auto-reload
// ---------------------------------------------------------------------------

/// Check if the loaded graph is stale and optionally reload.
///
/// Called at the top of every query function. Cost: one single-row PK
/// lookup on the generation table.
///
/// Behavior:
/// - No graph loaded → return immediately
/// - Generation table inaccessible → skip check, serve loaded graph
/// - Fresh (loaded_generation >= current) → return immediately
/// - Stale + auto_reload=false → return (serve stale)
/// - Stale + auto_reload=true + debounce not elapsed → return (serve stale)
/// - Stale + auto_reload=true + debounce elapsed → reload inline
pub fn ensure_fresh() {
    let Some((source, loaded_gen, loaded_at)) =
        state::with_graph(|gs| (gs.source.clone(), gs.loaded_generation, gs.loaded_at))
    else {
        return;
    };

    let Some(current_gen) = fetch_generation(&source) else {
        return;
    };

    if loaded_gen >= current_gen {
        return;
    }

    if !guc::AUTO_RELOAD.get() {
        return;
    }

    let debounce_secs = guc::RELOAD_DEBOUNCE_SEC.get() as u64;
    if debounce_secs > 0 {
        let elapsed = loaded_at.elapsed().as_secs();
        if elapsed < debounce_secs {
            notice!(
                "rabbit_graph: stale (gen {} vs {}), debouncing ({}/{}s)",
                loaded_gen,
                current_gen,
                elapsed,
                debounce_secs
            );
            return;
        }
    }

    notice!(
        "rabbit_graph: auto-reloading '{}' (gen {} -> {})",
        source,
        loaded_gen,
        current_gen
    );

    crate::load::do_load();
}
