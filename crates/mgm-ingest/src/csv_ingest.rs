use csv::ReaderBuilder;
use tracing::debug;

use crate::dates::{DateParser, apply_date_policy};
use crate::error::IngestError;
use crate::raw_table::RawTable;

/// Parse delimited text (comma separated, first row is the header).
pub fn read_delimited(bytes: &[u8]) -> Result<RawTable, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let Some(first) = records.next() else {
        return Ok(RawTable::default());
    };
    let headers: Vec<String> = first?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    let table = RawTable::from_records(headers, rows)?;
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "delimited text read"
    );
    Ok(table)
}

/// Parse delimited text and apply the date policy to `date_fields`.
pub fn from_delimited_text(
    bytes: &[u8],
    date_fields: &[String],
    date_parser: &dyn DateParser,
) -> Result<RawTable, IngestError> {
    let mut table = read_delimited(bytes)?;
    apply_date_policy(&mut table, date_fields, date_parser)?;
    Ok(table)
}
