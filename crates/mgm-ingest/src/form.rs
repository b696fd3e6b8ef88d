//! Editable-grid form decoding.
//!
//! The grid posts one flat list of `(key, value)` pairs. Keys are
//! `<row>_<col>`; every row is a group of `width + 1` cells where column 0
//! holds the display index and columns `1..=width` hold the schema fields.

use serde::{Deserialize, Serialize};
use tracing::debug;

use mgm_model::{Row, SchemaRegistry, Table};

use crate::error::IngestError;

/// What the submitter asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormAction {
    /// Re-run normalization and validation on the edited table.
    #[default]
    Change,
    /// Same as `Change`, then append a copy of the last row.
    NewLine,
    /// Validate and, if nothing is fatal, export the table.
    Save,
}

impl FormAction {
    /// Unknown actions fall back to `Change`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "new_line" => Self::NewLine,
            "save" => Self::Save,
            _ => Self::Change,
        }
    }
}

/// One grid submission with its out-of-band keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub user_name: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub pairs: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn action(&self) -> FormAction {
        FormAction::parse(&self.action)
    }
}

/// Shape of the grid: how many schema fields each row group carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    columns: Vec<String>,
}

impl FormLayout {
    pub fn for_schema(registry: &SchemaRegistry) -> Self {
        Self {
            columns: registry.fields().to_vec(),
        }
    }

    /// Fields per row group, excluding the display index cell.
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

fn parse_key(key: &str) -> Result<(usize, usize), IngestError> {
    let malformed = || IngestError::MalformedForm(format!("invalid cell key '{key}'"));
    let (row, col) = key.split_once('_').ok_or_else(malformed)?;
    let row = row.parse().map_err(|_| malformed())?;
    let col = col.parse().map_err(|_| malformed())?;
    Ok((row, col))
}

/// Decode grid pairs into a schema-aligned table.
///
/// Row groups must arrive row by row with contiguous row numbers and
/// columns in order. No pairs at all is `NoInput`; rows that are all empty
/// are `EmptySubmission`.
pub fn from_form_pairs(
    pairs: &[(String, String)],
    layout: &FormLayout,
) -> Result<Table, IngestError> {
    if pairs.is_empty() {
        return Err(IngestError::NoInput);
    }
    let group = layout.width() + 1;
    if pairs.len() % group != 0 {
        return Err(IngestError::MalformedForm(format!(
            "{} cells do not form rows of {group}",
            pairs.len()
        )));
    }

    let mut table = Table::new(layout.columns.clone());
    let mut first_row = None;
    for (offset, chunk) in pairs.chunks(group).enumerate() {
        let mut cells = Vec::with_capacity(layout.width());
        for (expected_col, (key, value)) in chunk.iter().enumerate() {
            let (row, col) = parse_key(key)?;
            let base = *first_row.get_or_insert(row);
            if row != base + offset || col != expected_col {
                return Err(IngestError::MalformedForm(format!(
                    "cell '{key}' is out of order, expected '{}_{expected_col}'",
                    base + offset
                )));
            }
            if col > 0 {
                cells.push(value.clone());
            }
        }
        table.push_row(Row::new(cells))?;
    }

    if table.is_all_blank() {
        return Err(IngestError::EmptySubmission);
    }
    debug!(rows = table.len(), "form decoded");
    Ok(table)
}
