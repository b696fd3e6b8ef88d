use mgm_ingest::{
    FormLayout, IngestError, from_form_pairs, from_upload, read_delimited, read_spreadsheet,
};
use mgm_model::{DataType, FieldSpec, SchemaRegistry, ValidationIssue};
use rust_xlsxwriter::Workbook;

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_specs(vec![
        FieldSpec::free("sampleID", DataType::String),
        FieldSpec::free("collection_date", DataType::Date),
        FieldSpec::free("depth", DataType::Float),
        FieldSpec::fixed("source_type", ["Soil", "Water"]),
        FieldSpec::free("notes", DataType::String),
    ])
    .expect("registry")
}

fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if let Ok(number) = value.parse::<f64>() {
                sheet.write_number(r as u32, c as u16, number).unwrap();
            } else {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    workbook.save_to_buffer().expect("workbook bytes")
}

#[test]
fn csv_upload_is_aligned_to_schema() {
    let bytes = b"notes , sampleID,collection_date\n  first ,S1,2021\n,,\nsecond,S2,2021-06-15\n";
    let table = from_upload("samples.CSV", bytes, &registry()).expect("upload");

    assert_eq!(
        table.columns,
        vec!["sampleID", "collection_date", "depth", "source_type", "notes"]
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0].cells, vec!["S1", "2021-01-01", "", "", "first"]);
    assert_eq!(table.rows[1].cells, vec!["S2", "2021-06-15", "", "", "second"]);
}

#[test]
fn unexpected_column_discards_the_table() {
    let bytes = b"sampleID,speciesx\nS1,E. coli\n";
    let err = from_upload("samples.csv", bytes, &registry()).unwrap_err();
    assert_eq!(
        err.into_issues(),
        vec![ValidationIssue::UnexpectedColumn {
            name: "speciesx".to_string()
        }]
    );
}

#[test]
fn unexpected_spreadsheet_column_discards_the_table() {
    let bytes = workbook_bytes(&[
        &["sampleID", "speciesx", "depth"],
        &["S1", "E. coli", "3"],
    ]);
    let err = from_upload("samples.xlsx", &bytes, &registry()).unwrap_err();
    assert_eq!(
        err.into_issues(),
        vec![ValidationIssue::UnexpectedColumn {
            name: "speciesx".to_string()
        }]
    );
}

#[test]
fn unparseable_date_fails_the_file() {
    let bytes = b"sampleID,collection_date\nS1,last tuesday\n";
    let err = from_upload("samples.csv", bytes, &registry()).unwrap_err();
    assert!(matches!(err, IngestError::InvalidDate { row: 1, .. }));
    let issues = err.into_issues();
    assert!(matches!(issues[..], [ValidationIssue::UnreadableInput { .. }]));
}

#[test]
fn header_only_upload_is_empty() {
    let err = from_upload("samples.csv", b"sampleID,notes\n", &registry()).unwrap_err();
    assert!(matches!(err, IngestError::EmptySubmission));
}

#[test]
fn spreadsheet_upload_reads_first_sheet() {
    let bytes = workbook_bytes(&[
        &["sampleID", "depth", "collection_date", "source_type"],
        &["S1", "12", "2021", "soil"],
        &["S2", "0.5", "2020-03", "Water"],
    ]);
    let raw = read_spreadsheet(&bytes).expect("read workbook");
    assert_eq!(raw.rows[0], vec!["S1", "12", "2021", "soil"]);

    let table = from_upload("plate.xlsx", &bytes, &registry()).expect("upload");
    assert_eq!(table.rows[0].cells, vec!["S1", "2021-01-01", "12", "soil", ""]);
    assert_eq!(table.rows[1].cells, vec!["S2", "2020-03-01", "0.5", "Water", ""]);
}

#[test]
fn unsupported_extension_is_fatal() {
    let err = from_upload("samples.tsv", b"sampleID\nS1\n", &registry()).unwrap_err();
    assert_eq!(
        err.into_issues(),
        vec![ValidationIssue::UnsupportedFileType {
            extension: "tsv".to_string()
        }]
    );
}

#[test]
fn csv_and_form_agree_on_layout() {
    let registry = registry();
    let from_csv = read_delimited(b"sampleID,depth\nS1,2\n").unwrap();
    assert_eq!(from_csv.headers, vec!["sampleID", "depth"]);

    let pairs: Vec<(String, String)> = ["1", "S1", "", "2", "", ""]
        .iter()
        .enumerate()
        .map(|(col, value)| (format!("0_{col}"), (*value).to_string()))
        .collect();
    let table = from_form_pairs(&pairs, &FormLayout::for_schema(&registry)).unwrap();
    assert_eq!(table.columns, registry.fields());
    assert_eq!(table.rows[0].cells, vec!["S1", "", "2", "", ""]);
}
