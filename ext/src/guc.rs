use std::ffi::CString;

use pgrx::guc::*;

pub static CATEGORY_TABLE: GucSetting<Option<CString>> =
    GucSetting::<Option<CString>>::new(Some(c"categories_category"));

pub static CATEGORY_NAME_COLUMN: GucSetting<Option<CString>> =
    GucSetting::<Option<CString>>::new(Some(c"name"));

pub static SIMILARITY_TABLE: GucSetting<Option<CString>> =
    GucSetting::<Option<CString>>::new(Some(c"categories_categorysimilarity"));

pub static SIMILARITY_COLUMNS: GucSetting<Option<CString>> =
    GucSetting::<Option<CString>>::new(Some(c"category_a_id,category_b_id"));

pub static MAX_MEMORY_MB: GucSetting<i32> = GucSetting::<i32>::new(4096);

pub static AUTO_RELOAD: GucSetting<bool> = GucSetting::<bool>::new(true);

pub static RELOAD_DEBOUNCE_SEC: GucSetting<i32> = GucSetting::<i32>::new(5);

/// Read a string GUC, returning None if unset or empty.
pub fn get_string(setting: &GucSetting<Option<CString>>) -> Option<String> {
    setting
        .get()
        .and_then(|cs| cs.into_string().ok())
        .filter(|s| !s.is_empty())
}

pub fn register_gucs() {
    GucRegistry::define_string_guc(
        c"rabbit_graph.category_table",
        c"Table holding the categories",
        c"Every row becomes a graph node. Must have an integer id column.",
        &CATEGORY_TABLE,
        GucContext::Userset,
        GucFlags::default(),
    );

    GucRegistry::define_string_guc(
        c"rabbit_graph.category_name_column",
        c"Column of the category table used as display name",
        c"Names are kept next to the graph and attached to query results.",
        &CATEGORY_NAME_COLUMN,
        GucContext::Userset,
        GucFlags::default(),
    );

    GucRegistry::define_string_guc(
        c"rabbit_graph.similarity_table",
        c"Table holding undirected category similarity pairs",
        c"Also the key under which rabbit_graph_invalidate() tracks generations.",
        &SIMILARITY_TABLE,
        GucContext::Userset,
        GucFlags::default(),
    );

    GucRegistry::define_string_guc(
        c"rabbit_graph.similarity_columns",
        c"Two comma-separated columns of the similarity table",
        c"Each row pairs the categories named by these two columns.",
        &SIMILARITY_COLUMNS,
        GucContext::Userset,
        GucFlags::default(),
    );

    GucRegistry::define_int_guc(
        c"rabbit_graph.max_memory_mb",
        c"Maximum memory for the in-memory similarity graph (MB)",
        c"Per-backend memory cap. rabbit_graph_load() will error if the graph exceeds this.",
        &MAX_MEMORY_MB,
        64,
        131072, // 128 GB
        GucContext::Userset,
        GucFlags::default(),
    );

    GucRegistry::define_bool_guc(
        c"rabbit_graph.auto_reload",
        c"Automatically reload when generation mismatch detected",
        c"When true, query functions check the generation table and reload inline if stale.",
        &AUTO_RELOAD,
        GucContext::Userset,
        GucFlags::default(),
    );

    GucRegistry::define_int_guc(
        c"rabbit_graph.reload_debounce_sec",
        c"Minimum seconds between auto-reloads",
        c"Prevents reload thrashing while categories are being edited in bulk. 0 disables debouncing.",
        &RELOAD_DEBOUNCE_SEC,
        0,
        3600, // 1 hour
        GucContext::Userset,
        GucFlags::default(),
    );
}
