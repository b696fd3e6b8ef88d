#![deny(unsafe_code)]

//! Schema source parsing.
//!
//! The source is a CSV file with one field per line:
//!
//! ```text
//! field,datatype,choice,options
//! sampleID,string,free,
//! source_type,string,fix,Soil|Water|Sediment
//! ```

use std::path::Path;

use tracing::{debug, info};

use mgm_model::{ChoiceKind, DataType, FieldSpec, SchemaRegistry};

use crate::error::SchemaLoadError;
use crate::hash::sha256_hex;

const COL_FIELD: &str = "field";
const COL_DATATYPE: &str = "datatype";
const COL_CHOICE: &str = "choice";
const COL_OPTIONS: &str = "options";

/// Separator between allowed values in the `options` column.
pub const OPTION_SEPARATOR: char = '|';

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().trim_matches('\u{feff}').eq_ignore_ascii_case(name))
}

fn get_string(row: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn split_options(raw: Option<String>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(OPTION_SEPARATOR)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load the schema registry from a CSV source file.
pub fn load_schema(path: &Path) -> Result<SchemaRegistry, SchemaLoadError> {
    let bytes = std::fs::read(path).map_err(|e| SchemaLoadError::io(path, e))?;
    let registry = parse_schema_csv(&bytes, path)?.with_fingerprint(sha256_hex(&bytes));
    info!(
        path = %path.display(),
        field_count = registry.len(),
        fingerprint = registry.fingerprint().unwrap_or_default(),
        "schema loaded"
    );
    Ok(registry)
}

/// Parse schema CSV bytes. `path` is only used for error messages.
pub fn parse_schema_csv(bytes: &[u8], path: &Path) -> Result<SchemaRegistry, SchemaLoadError> {
    let csv_error = |e: csv::Error| SchemaLoadError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let headers = reader.headers().map_err(csv_error)?.clone();

    let required = |column: &str| {
        header_index(&headers, column).ok_or_else(|| SchemaLoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
    };
    let idx_field = required(COL_FIELD)?;
    let idx_datatype = required(COL_DATATYPE)?;
    let idx_choice = header_index(&headers, COL_CHOICE);
    let idx_options = header_index(&headers, COL_OPTIONS);

    let mut specs = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let line = row.position().map(csv::Position::line).unwrap_or_default();
        let invalid = |message: String| SchemaLoadError::InvalidEntry {
            path: path.to_path_buf(),
            line,
            message,
        };

        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let name = get_string(&row, Some(idx_field))
            .ok_or_else(|| invalid("missing field name".to_string()))?;
        let data_type = get_string(&row, Some(idx_datatype))
            .ok_or_else(|| invalid(format!("missing data type for {name}")))?
            .parse::<DataType>()
            .map_err(|e| invalid(format!("{name}: {e}")))?;
        let choice_kind = get_string(&row, idx_choice)
            .unwrap_or_default()
            .parse::<ChoiceKind>()
            .map_err(|e| invalid(format!("{name}: {e}")))?;
        let mut allowed_values = split_options(get_string(&row, idx_options));
        if choice_kind == ChoiceKind::Free && !allowed_values.is_empty() {
            debug!(field = %name, "ignoring options on free-text field");
            allowed_values.clear();
        }

        specs.push(FieldSpec {
            name,
            data_type,
            choice_kind,
            allowed_values,
        });
    }

    SchemaRegistry::from_specs(specs).map_err(|source| SchemaLoadError::Schema {
        path: path.to_path_buf(),
        source,
    })
}
