//! Schema source path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the schema source. Read by the CLI
/// settings layer, not here.
pub const SCHEMA_ENV_VAR: &str = "META_SCHEMA_PATH";

/// The bundled `standards/schema.csv` relative to the workspace root.
pub fn default_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards/schema.csv")
}
