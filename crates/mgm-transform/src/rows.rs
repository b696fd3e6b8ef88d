use mgm_model::{IndexedTable, Row, Table};

/// Remove rows whose cells are all empty. Returns how many were removed.
pub fn drop_blank_rows(table: &mut Table) -> usize {
    let before = table.rows.len();
    table.rows.retain(|row| !row.is_blank());
    before - table.rows.len()
}

/// Append a copy of the last row with `primary_field` cleared, so the new
/// sample starts from its neighbour's values but needs its own identifier.
///
/// Nothing is appended when the table is empty or the last row is blank.
pub fn duplicate_last_row_on_append(table: &mut Table, primary_field: &str) -> bool {
    let Some(last) = table.rows.last().filter(|row| !row.is_blank()) else {
        return false;
    };
    let mut copy: Row = last.clone();
    if let Some(idx) = table.column_index(primary_field) {
        copy.cells[idx].clear();
    }
    table.rows.push(copy);
    true
}

/// Wrap a table for display with a 1-based `No` column in front.
pub fn with_display_index(table: Table) -> IndexedTable {
    IndexedTable::new(table)
}
