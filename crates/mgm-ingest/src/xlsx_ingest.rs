use std::io::Cursor;

use calamine::{Data, DataType as _, Reader, Xlsx, open_workbook_from_rs};
use tracing::debug;

use crate::dates::{DateParser, apply_date_policy, render_date};
use crate::error::IngestError;
use crate::raw_table::RawTable;

/// Render a spreadsheet cell as the text a person would type for it.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            value.clone()
        }
        Data::Int(value) => value.to_string(),
        Data::Float(value) => float_text(*value),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => render_date(dt.date()),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string(),
        },
        Data::Error(error) => error.to_string(),
    }
}

/// Integral floats lose the `.0` a number-typed column would add.
fn float_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Read the first worksheet of an XLSX workbook; its first row is the header.
pub fn read_spreadsheet(bytes: &[u8]) -> Result<RawTable, IngestError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::Unreadable("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let Some(first) = rows.next() else {
        return Ok(RawTable::default());
    };
    let headers: Vec<String> = first.iter().map(cell_text).collect();
    let records: Vec<Vec<String>> = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    let table = RawTable::from_records(headers, records)?;
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "worksheet read"
    );
    Ok(table)
}

/// Read a workbook and apply the date policy to `date_fields`.
pub fn from_spreadsheet(
    bytes: &[u8],
    date_fields: &[String],
    date_parser: &dyn DateParser,
) -> Result<RawTable, IngestError> {
    let mut table = read_spreadsheet(bytes)?;
    apply_date_policy(&mut table, date_fields, date_parser)?;
    Ok(table)
}
