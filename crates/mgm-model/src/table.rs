#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::SchemaRegistry;

/// Header of the display-only sequence column.
pub const DISPLAY_INDEX_COLUMN: &str = "No";

/// One sample record, one raw text cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn blank(width: usize) -> Self {
        Self {
            cells: vec![String::new(); width],
        }
    }

    /// True when every cell is the empty string.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(String::is_empty)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rows aligned to a fixed column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Empty table whose columns are the schema fields.
    pub fn for_schema(registry: &SchemaRegistry) -> Self {
        Self::new(registry.fields().to_vec())
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.width() {
            return Err(ModelError::RowWidth {
                expected: self.width(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.cells.get(idx).map(String::as_str)
    }

    pub fn set_cell(&mut self, row: usize, column: &str, value: impl Into<String>) -> Result<()> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| ModelError::UnknownField(column.to_string()))?;
        if let Some(target) = self.rows.get_mut(row) {
            target.cells[idx] = value.into();
        }
        Ok(())
    }

    /// True when there is no row with a non-empty cell.
    pub fn is_all_blank(&self) -> bool {
        self.rows.iter().all(Row::is_blank)
    }
}

/// A table with a prepended 1-based sequence column for display.
///
/// The index column is not part of the schema, so this type is never
/// validated or exported; convert back with [`IndexedTable::into_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedTable {
    table: Table,
}

impl IndexedTable {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    /// Header row including the index column.
    pub fn columns(&self) -> Vec<&str> {
        std::iter::once(DISPLAY_INDEX_COLUMN)
            .chain(self.table.columns.iter().map(String::as_str))
            .collect()
    }

    /// Rows with the sequence number as the first cell.
    pub fn display_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.table.rows.iter().enumerate().map(|(idx, row)| {
            let mut cells = Vec::with_capacity(row.len() + 1);
            cells.push((idx + 1).to_string());
            cells.extend(row.cells.iter().cloned());
            cells
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut table = Table::new(vec!["sampleID".to_string(), "depth".to_string()]);
        table
            .push_row(Row::new(vec!["S1".to_string(), "3".to_string()]))
            .unwrap();
        table.push_row(Row::blank(2)).unwrap();
        table
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut table = table();
        let result = table.push_row(Row::new(vec!["only one".to_string()]));
        assert!(matches!(
            result,
            Err(ModelError::RowWidth {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn reads_and_writes_cells_by_name() {
        let mut table = table();
        assert_eq!(table.cell(0, "depth"), Some("3"));
        table.set_cell(1, "sampleID", "S2").unwrap();
        assert_eq!(table.cell(1, "sampleID"), Some("S2"));
        assert!(table.set_cell(0, "speciesx", "x").is_err());
    }

    #[test]
    fn indexed_table_prepends_sequence() {
        let indexed = IndexedTable::new(table());
        assert_eq!(indexed.columns(), vec!["No", "sampleID", "depth"]);
        let rows: Vec<_> = indexed.display_rows().collect();
        assert_eq!(rows[0], vec!["1", "S1", "3"]);
        assert_eq!(rows[1], vec!["2", "", ""]);
        assert_eq!(indexed.into_table().width(), 2);
    }
}
