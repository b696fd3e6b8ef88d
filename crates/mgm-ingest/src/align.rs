use mgm_model::{Row, SchemaRegistry, Table};

use crate::error::IngestError;
use crate::raw_table::RawTable;

/// Reject imported headers the schema does not know, all of them at once.
pub fn check_columns(raw: &RawTable, registry: &SchemaRegistry) -> Result<(), IngestError> {
    let unexpected: Vec<String> = raw
        .headers
        .iter()
        .filter(|header| !registry.contains(header))
        .cloned()
        .collect();
    if unexpected.is_empty() {
        Ok(())
    } else {
        Err(IngestError::UnexpectedColumns(unexpected))
    }
}

/// Reindex to exactly the schema field order. Schema fields the input did
/// not provide are filled with `""`; unknown input columns are ignored.
pub fn align_to_schema(raw: &RawTable, registry: &SchemaRegistry) -> Result<Table, IngestError> {
    let sources: Vec<Option<usize>> = registry
        .fields()
        .iter()
        .map(|field| raw.column_index(field))
        .collect();

    let mut table = Table::for_schema(registry);
    for record in &raw.rows {
        let cells = sources
            .iter()
            .map(|source| {
                source
                    .and_then(|col| record.get(col))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect();
        table.push_row(Row::new(cells))?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use mgm_model::{DataType, FieldSpec};

    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_specs(vec![
            FieldSpec::free("sampleID", DataType::String),
            FieldSpec::free("depth", DataType::Float),
            FieldSpec::free("notes", DataType::String),
        ])
        .unwrap()
    }

    #[test]
    fn reorders_and_fills_missing_fields() {
        let raw = RawTable {
            headers: vec!["depth".into(), "sampleID".into()],
            rows: vec![vec!["2".into(), "S1".into()]],
        };
        let table = align_to_schema(&raw, &registry()).unwrap();
        assert_eq!(table.columns, vec!["sampleID", "depth", "notes"]);
        assert_eq!(table.rows[0].cells, vec!["S1", "2", ""]);
    }

    #[test]
    fn batches_unexpected_columns() {
        let raw = RawTable {
            headers: vec!["sampleID".into(), "speciesx".into(), "colour".into()],
            rows: Vec::new(),
        };
        let err = check_columns(&raw, &registry()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnexpectedColumns(ref names) if names == &["speciesx", "colour"]
        ));
    }
}
