/// Rows scanned when unioning field names during a table merge
pub const DEFAULT_SCHEMA_SAMPLE_LIMIT: usize = 200;
/// Recompute passes allowed before a cyclic graph is left unsettled
pub const DEFAULT_MAX_FIXED_POINT_PASSES: usize = 16;
/// Source type recorded on nodes created by `import_dataset`
pub const IMPORT_SOURCE_TYPE: &str = "import";
/// Source type for rows listed inline in a config file
pub const MEMORY_SOURCE_TYPE: &str = "memory";
/// Source type for rows read from a JSON array on disk
pub const JSON_FILE_SOURCE_TYPE: &str = "json_file";
