use mgm_ingest::from_upload;
use mgm_model::{DataType, FieldSpec, Row, SchemaRegistry, Table};
use mgm_report::{export_csv, write_export};

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_specs(vec![
        FieldSpec::free("sampleID", DataType::String),
        FieldSpec::free("collection_date", DataType::Date),
        FieldSpec::free("locality", DataType::String),
        FieldSpec::free("depth", DataType::Float),
        FieldSpec::free("notes", DataType::String),
    ])
    .unwrap()
}

#[test]
fn exported_csv_reimports_to_the_same_cells() {
    let registry = registry();
    let mut table = Table::for_schema(&registry);
    for cells in [
        ["S1", "2021-06-15", "Canada: Ontario", "3.5", "a; b"],
        ["S2", "", "", "", "said \"hi\", left"],
        ["", "2020-01-01", "Peru", "12", ""],
        ["S4", "2021-06-15T08:30:00.000Z", "", "", ""],
    ] {
        table
            .push_row(Row::new(cells.iter().map(|c| (*c).to_string()).collect()))
            .unwrap();
    }

    let csv_text = export_csv(&table).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = write_export(dir.path(), "alice_2024-01-01-00-00-00.csv", &csv_text).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    let reimported = from_upload("alice_2024-01-01-00-00-00.csv", &bytes, &registry).unwrap();
    assert_eq!(reimported, table);
}
