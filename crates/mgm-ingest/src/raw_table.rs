use std::collections::BTreeSet;

use tracing::warn;

use crate::error::IngestError;

/// Column-name-aligned text rows straight out of a parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Build a table from header and record rows as read, then clean it.
    ///
    /// Cells are trimmed, short rows padded with `""`, rows with every cell
    /// empty dropped. Later duplicates of a header are dropped, as are
    /// unnamed columns with no data. A row with data beyond the last header
    /// cannot be aligned and fails the input.
    pub fn from_records(
        headers: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Result<Self, IngestError> {
        let headers: Vec<String> = headers.iter().map(|h| normalize_cell(h)).collect();
        let width = headers.len();

        let mut rows = Vec::with_capacity(records.len());
        for (idx, record) in records.into_iter().enumerate() {
            let mut row: Vec<String> = record.iter().map(|cell| normalize_cell(cell)).collect();
            if row.len() > width {
                if row[width..].iter().any(|cell| !cell.is_empty()) {
                    return Err(IngestError::Unreadable(format!(
                        "row {} has {} values but the header has {width} columns",
                        idx + 1,
                        row.len()
                    )));
                }
                row.truncate(width);
            }
            row.resize(width, String::new());
            if row.iter().all(String::is_empty) {
                continue;
            }
            rows.push(row);
        }

        let mut seen = BTreeSet::new();
        let mut keep = Vec::with_capacity(width);
        for (col, header) in headers.iter().enumerate() {
            if header.is_empty() {
                if rows.iter().any(|row| !row[col].is_empty()) {
                    keep.push(col);
                }
                continue;
            }
            if seen.insert(header.as_str()) {
                keep.push(col);
            } else {
                warn!(column = %header, "duplicate column header dropped");
            }
        }

        let table = if keep.len() == width {
            Self { headers, rows }
        } else {
            Self {
                headers: keep.iter().map(|&col| headers[col].clone()).collect(),
                rows: rows
                    .into_iter()
                    .map(|row| keep.iter().map(|&col| row[col].clone()).collect())
                    .collect(),
            }
        };
        Ok(table)
    }
}
