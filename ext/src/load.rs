use std::collections::HashMap;
use std::time::Instant;

use pgrx::prelude::*;
use rabbit_graph_core::{GraphBuilder, NodeId};

use crate::generation;
use crate::guc;
use crate::state::{self, GraphState};

#[pg_extern]
fn rabbit_graph_load() -> TableIterator<
    'static,
    (
        name!(node_count, i64),
        name!(edge_count, i64),
        name!(self_edges_skipped, i64),
        name!(duplicate_edges_skipped, i64),
        name!(load_time_ms, f64),
    ),
> {
    let summary = do_load();
    TableIterator::once((
        summary.node_count as i64,
        summary.edge_count as i64,
        summary.self_edges_skipped as i64,
        summary.duplicate_edges_skipped as i64,
        summary.load_time_ms,
    ))
}

pub struct LoadSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub self_edges_skipped: usize,
    pub duplicate_edges_skipped: usize,
    pub load_time_ms: f64,
}

/// Where the categories and their similarity pairs live, as configured by GUCs.
pub struct CatalogTables {
    pub category_table: String,
    pub name_column: String,
    pub similarity_table: String,
    pub column_a: String,
    pub column_b: String,
}

impl CatalogTables {
    pub fn from_gucs() -> Self {
        let category_table = guc::get_string(&guc::CATEGORY_TABLE).unwrap_or_else(|| {
            error!("rabbit_graph: rabbit_graph.category_table is not set");
        });
        let name_column = guc::get_string(&guc::CATEGORY_NAME_COLUMN).unwrap_or_else(|| {
            error!("rabbit_graph: rabbit_graph.category_name_column is not set");
        });
        let similarity_table = guc::get_string(&guc::SIMILARITY_TABLE).unwrap_or_else(|| {
            error!("rabbit_graph: rabbit_graph.similarity_table is not set");
        });
        let columns = guc::get_string(&guc::SIMILARITY_COLUMNS).unwrap_or_default();
        let (column_a, column_b) = parse_column_pair(&columns);

        validate_name(&category_table);
        validate_name(&name_column);
        validate_name(&similarity_table);
        validate_name(&column_a);
        validate_name(&column_b);

        Self {
            category_table,
            name_column,
            similarity_table,
            column_a,
            column_b,
        }
    }
}

/// Read both tables and replace this backend's snapshot.
pub fn do_load() -> LoadSummary {
    let start = Instant::now();
    let tables = CatalogTables::from_gucs();

    let (builder, names, self_edges_skipped, loaded_generation) = Spi::connect(|client| {
        let loaded_generation =
            generation::fetch_generation_spi(&client, &tables.similarity_table).unwrap_or(0);

        let mut builder = GraphBuilder::new();
        let names = load_categories(&client, &tables, &mut builder)?;
        let self_edges = load_similarities(&client, &tables, &mut builder)?;

        Ok::<_, pgrx::spi::SpiError>((builder, names, self_edges, loaded_generation))
    })
    .unwrap_or_else(|e| {
        error!("rabbit_graph_load: SPI error: {}", e);
    });

    let duplicate_edges_skipped = builder.duplicate_edges();
    let graph = builder.build();

    let memory_mb = graph.memory_usage() / (1024 * 1024);
    let max_mb = guc::MAX_MEMORY_MB.get() as usize;
    if memory_mb > max_mb {
        error!(
            "rabbit_graph: loaded graph uses {}MB, exceeds rabbit_graph.max_memory_mb={}MB",
            memory_mb, max_mb
        );
    }

    let summary = LoadSummary {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        self_edges_skipped,
        duplicate_edges_skipped,
        load_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    state::set_graph(GraphState {
        graph,
        names,
        category_table: tables.category_table,
        source: tables.similarity_table,
        self_edges_skipped,
        duplicate_edges_skipped,
        load_time_ms: summary.load_time_ms,
        loaded_at: Instant::now(),
        loaded_generation,
    });

    summary
}

// ---------------------------------------------------------------------------
// Category loading
// ---------------------------------------------------------------------------

/// Declare every category as a node, in id order, and collect display names.
fn load_categories(
    client: &pgrx::spi::SpiClient<'_>,
    tables: &CatalogTables,
    builder: &mut GraphBuilder,
) -> Result<HashMap<NodeId, String>, pgrx::spi::SpiError> {
    let query = format!(
        "SELECT id::text AS category_id, {}::text AS category_name FROM {} ORDER BY id",
        tables.name_column, tables.category_table
    );

    let mut names = HashMap::new();
    let table = client.select(&query, None, &[])?;
    for row in table {
        let id_str: Option<String> = row.get_by_name("category_id")?;
        let name: Option<String> = row.get_by_name("category_name")?;

        let Some(id) = id_str.as_deref().and_then(parse_node_id) else {
            continue;
        };

        builder.add_node(id);
        if let Some(name) = name {
            names.insert(id, name);
        }
    }

    Ok(names)
}

// ---------------------------------------------------------------------------
// Similarity loading
// ---------------------------------------------------------------------------

/// Add every similarity pair. Self-pairs are reported and skipped; repeated
/// pairs are counted by the builder. Returns the number of self-pairs.
fn load_similarities(
    client: &pgrx::spi::SpiClient<'_>,
    tables: &CatalogTables,
    builder: &mut GraphBuilder,
) -> Result<usize, pgrx::spi::SpiError> {
    // Sorted so neighbor order, and with it every tie-break, is reproducible.
    let query = format!(
        "SELECT {a}::text AS pair_a, {b}::text AS pair_b FROM {t} ORDER BY {a}, {b}",
        a = tables.column_a,
        b = tables.column_b,
        t = tables.similarity_table
    );

    let mut self_edges = 0;
    let table = client.select(&query, None, &[])?;
    for row in table {
        let a_str: Option<String> = row.get_by_name("pair_a")?;
        let b_str: Option<String> = row.get_by_name("pair_b")?;

        let (Some(a), Some(b)) = (
            a_str.as_deref().and_then(parse_node_id),
            b_str.as_deref().and_then(parse_node_id),
        ) else {
            continue;
        };

        if let Err(e) = builder.add_edge(a, b) {
            warning!("rabbit_graph: skipping similarity row: {}", e);
            self_edges += 1;
        }
    }

    Ok(self_edges)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_node_id(s: &str) -> Option<NodeId> {
    s.parse().ok()
}

/// Validate a (possibly schema-qualified) identifier before it is spliced
/// into SQL. Raises a PostgreSQL ERROR otherwise.
pub fn validate_name(name: &str) -> &str {
    let valid = !name.is_empty()
        && name.split('.').count() <= 2
        && name.split('.').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if !valid {
        error!("rabbit_graph: invalid identifier: '{}'", name);
    }
    name
}

fn parse_column_pair(setting: &str) -> (String, String) {
    let columns: Vec<String> = setting
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    match columns.as_slice() {
        [a, b] => (a.clone(), b.clone()),
        _ => error!(
            "rabbit_graph: rabbit_graph.similarity_columns must name exactly two columns, got '{}'",
            setting
        ),
    }
}
