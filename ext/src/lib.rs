//! rabbit_graph: PostgreSQL extension for category similarity rabbit holes.
//!
//! Wraps rabbit-graph-core to answer shortest-path, island and longest-path
//! queries over a category table and its undirected similarity pairs.
//! Per-backend state with generation-based cache invalidation.

use pgrx::prelude::*;

mod degree;
mod generation;
mod guc;
mod islands;
mod load;
mod neighborhood;
mod path;
mod state;
mod status;
mod util;

pg_module_magic!();

#[allow(non_snake_case)]
#[pg_guard]
pub extern "C-unwind" fn _PG_init() {
    guc::register_gucs();
}

#[cfg(any(test, feature = "pg_test"))]
#[pg_schema]
mod tests {
    use pgrx::prelude::*;

    /// 1-2-3-4 chain plus a 5-6 pair and a lonely 7. The repeated (2,1) row
    /// and the (4,4) self row must both be skipped.
    fn seed_catalog() {
        Spi::run(
            "CREATE TABLE categories_category (id bigint PRIMARY KEY, name text NOT NULL);
             INSERT INTO categories_category VALUES
                (1, 'Cats'), (2, 'Lions'), (3, 'Savanna'), (4, 'Africa'),
                (5, 'Jazz'), (6, 'Blues'), (7, 'Origami');
             CREATE TABLE categories_categorysimilarity (
                id serial PRIMARY KEY,
                category_a_id bigint NOT NULL,
                category_b_id bigint NOT NULL
             );
             INSERT INTO categories_categorysimilarity (category_a_id, category_b_id) VALUES
                (1, 2), (2, 3), (3, 4), (5, 6), (2, 1), (4, 4);",
        )
        .expect("seed catalog");
        Spi::run("SELECT * FROM rabbit_graph_load()").expect("load");
    }

    #[pg_test]
    fn test_status_returns_not_loaded() {
        let result = Spi::get_one::<String>("SELECT status FROM rabbit_graph_status()");
        assert_eq!(result, Ok(Some("not_loaded".to_string())));
    }

    #[pg_test]
    fn test_guc_defaults() {
        let max_mem = Spi::get_one::<String>("SHOW rabbit_graph.max_memory_mb");
        assert_eq!(max_mem, Ok(Some("4096".to_string())));

        let table = Spi::get_one::<String>("SHOW rabbit_graph.similarity_table");
        assert_eq!(table, Ok(Some("categories_categorysimilarity".to_string())));
    }

    #[pg_test]
    fn test_invalidate_returns_generation() {
        let gen = Spi::get_one::<i64>("SELECT rabbit_graph_invalidate('test_pairs')");
        assert_eq!(gen, Ok(Some(1)));

        let gen2 = Spi::get_one::<i64>("SELECT rabbit_graph_invalidate('test_pairs')");
        assert_eq!(gen2, Ok(Some(2)));
    }

    #[pg_test]
    fn test_invalidate_separate_sources() {
        let g1 = Spi::get_one::<i64>("SELECT rabbit_graph_invalidate('pairs_a')");
        let g2 = Spi::get_one::<i64>("SELECT rabbit_graph_invalidate('pairs_b')");
        assert_eq!(g1, Ok(Some(1)));
        assert_eq!(g2, Ok(Some(1)));

        let g1_again = Spi::get_one::<i64>("SELECT rabbit_graph_invalidate('pairs_a')");
        assert_eq!(g1_again, Ok(Some(2)));
    }

    #[pg_test]
    fn test_invalidate_defaults_to_similarity_table() {
        let gen = Spi::get_one::<i64>("SELECT rabbit_graph_invalidate()");
        assert_eq!(gen, Ok(Some(1)));

        let source = Spi::get_one::<String>("SELECT source FROM rabbit_graph.generation");
        assert_eq!(source, Ok(Some("categories_categorysimilarity".to_string())));
    }

    #[pg_test(error = "rabbit_graph: no graph loaded — call rabbit_graph_load() first")]
    fn test_query_without_load_errors() {
        let _ = Spi::get_one::<i64>("SELECT count(*) FROM rabbit_hole(1, 2)");
    }

    #[pg_test]
    fn test_load_counts() {
        seed_catalog();

        let nodes = Spi::get_one::<i64>("SELECT node_count FROM rabbit_graph_status()");
        assert_eq!(nodes, Ok(Some(7)));
        let edges = Spi::get_one::<i64>("SELECT edge_count FROM rabbit_graph_status()");
        assert_eq!(edges, Ok(Some(4)));
        let dupes =
            Spi::get_one::<i64>("SELECT duplicate_edges_skipped FROM rabbit_graph_status()");
        assert_eq!(dupes, Ok(Some(1)));
        let selfs = Spi::get_one::<i64>("SELECT self_edges_skipped FROM rabbit_graph_status()");
        assert_eq!(selfs, Ok(Some(1)));
    }

    #[pg_test]
    fn test_rabbit_hole() {
        seed_catalog();

        let ids = Spi::get_one::<String>(
            "SELECT string_agg(category_id::text, ',' ORDER BY step) FROM rabbit_hole(1, 4)",
        );
        assert_eq!(ids, Ok(Some("1,2,3,4".to_string())));

        let last = Spi::get_one::<String>("SELECT name FROM rabbit_hole(1, 4) WHERE step = 3");
        assert_eq!(last, Ok(Some("Africa".to_string())));

        let across = Spi::get_one::<i64>("SELECT count(*) FROM rabbit_hole(1, 5)");
        assert_eq!(across, Ok(Some(0)));

        let same = Spi::get_one::<i64>("SELECT count(*) FROM rabbit_hole(7, 7)");
        assert_eq!(same, Ok(Some(1)));

        let unknown = Spi::get_one::<i64>("SELECT count(*) FROM rabbit_hole(-1, 99)");
        assert_eq!(unknown, Ok(Some(0)));
    }

    #[pg_test]
    fn test_rabbit_hole_json() {
        seed_catalog();

        let length = Spi::get_one::<String>("SELECT rabbit_hole_json(1, 4)->>'length'");
        assert_eq!(length, Ok(Some("3".to_string())));

        let first = Spi::get_one::<String>("SELECT rabbit_hole_json(1, 4)->'path'->0->>'name'");
        assert_eq!(first, Ok(Some("Cats".to_string())));

        let missing = Spi::get_one::<bool>("SELECT rabbit_hole_json(1, 6) IS NULL");
        assert_eq!(missing, Ok(Some(true)));
    }

    #[pg_test]
    fn test_rabbit_islands() {
        seed_catalog();

        let count = Spi::get_one::<i64>("SELECT count(*) FROM rabbit_islands()");
        assert_eq!(count, Ok(Some(3)));

        let sizes = Spi::get_one::<String>(
            "SELECT string_agg(size::text, ',' ORDER BY island) FROM rabbit_islands()",
        );
        assert_eq!(sizes, Ok(Some("4,2,1".to_string())));

        let big = Spi::get_one::<i64>("SELECT count(*) FROM rabbit_islands(2)");
        assert_eq!(big, Ok(Some(2)));

        let lonely = Spi::get_one::<String>(
            "SELECT categories->0->>'name' FROM rabbit_islands() WHERE size = 1",
        );
        assert_eq!(lonely, Ok(Some("Origami".to_string())));
    }

    #[pg_test]
    fn test_longest_rabbit_hole() {
        seed_catalog();

        let ids = Spi::get_one::<String>(
            "SELECT string_agg(category_id::text, ',' ORDER BY step) FROM longest_rabbit_hole()",
        );
        assert_eq!(ids, Ok(Some("4,3,2,1".to_string())));
    }

    #[pg_test]
    fn test_neighborhood_and_degree() {
        seed_catalog();

        let within_two =
            Spi::get_one::<i64>("SELECT count(*) FROM rabbit_graph_neighborhood(1, 2)");
        assert_eq!(within_two, Ok(Some(2)));

        let top = Spi::get_one::<i64>(
            "SELECT category_id FROM rabbit_graph_degree(1) ORDER BY degree DESC LIMIT 1",
        );
        assert_eq!(top, Ok(Some(2)));
    }

    #[pg_test]
    fn test_invalidate_marks_stale() {
        seed_catalog();
        Spi::run("SET rabbit_graph.auto_reload = off").expect("set guc");
        Spi::run("SELECT rabbit_graph_invalidate()").expect("invalidate");

        let status = Spi::get_one::<String>("SELECT status FROM rabbit_graph_status()");
        assert_eq!(status, Ok(Some("stale".to_string())));
    }
}

#[cfg(test)]
pub mod pg_test {
    pub fn setup(_options: Vec<&str>) {}

    pub fn postgresql_conf_options() -> Vec<&'static str> {
        vec![]
    }
}
