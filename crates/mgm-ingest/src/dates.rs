//! Date handling for imported files.
//!
//! Date columns are parsed on import and immediately rendered back to text
//! as `YYYY-MM-DD`, or `YYYY-MM-DDTHH:MM:SS.sssZ` when the value carried a
//! time of day; no typed value survives ingestion. Partial dates are
//! widened: `YYYY` becomes January 1st and `YYYY-MM` the first of the month.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::IngestError;
use crate::raw_table::RawTable;

/// A parsed date cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    Day(NaiveDate),
    /// The source value had a time component, taken as UTC.
    Instant(NaiveDateTime),
}

impl ParsedDate {
    /// Text stored back into the cell; both forms pass date validation.
    pub fn render(self) -> String {
        match self {
            ParsedDate::Day(date) => render_date(date),
            ParsedDate::Instant(instant) => render_timestamp(instant),
        }
    }
}

impl From<NaiveDate> for ParsedDate {
    fn from(date: NaiveDate) -> Self {
        ParsedDate::Day(date)
    }
}

impl From<NaiveDateTime> for ParsedDate {
    fn from(instant: NaiveDateTime) -> Self {
        ParsedDate::Instant(instant)
    }
}

/// Parses one non-empty date cell.
pub trait DateParser {
    fn parse(&self, value: &str) -> Option<ParsedDate>;
}

/// Length-dispatched policy: 4 chars is a year, 7 chars a year-month,
/// anything else goes through the general parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDateParser;

impl DateParser for DefaultDateParser {
    fn parse(&self, value: &str) -> Option<ParsedDate> {
        match value.chars().count() {
            4 => parse_year(value).map(ParsedDate::Day),
            7 => parse_year_month(value).map(ParsedDate::Day),
            _ => parse_general(value),
        }
    }
}

impl<F> DateParser for F
where
    F: Fn(&str) -> Option<ParsedDate>,
{
    fn parse(&self, value: &str) -> Option<ParsedDate> {
        self(value)
    }
}

fn parse_year(value: &str) -> Option<NaiveDate> {
    if !value.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let year = value.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

fn parse_year_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    if !year.chars().chain(month.chars()).all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn parse_general(value: &str) -> Option<ParsedDate> {
    // RFC 3339 / ISO 8601 with offset or Z suffix
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(ParsedDate::Instant(dt.naive_utc()));
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(ParsedDate::Instant(dt));
        }
    }

    let date_formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y.%m.%d",
        "%d-%b-%Y", // 15-Jan-2024
        "%d-%B-%Y", // 15-January-2024
        "%m/%d/%Y", // month first, as the general parser defaults to
        "%d/%m/%Y",
        "%d.%m.%Y",
        "%Y%m%d",
        "%b %d, %Y",
        "%B %d, %Y",
        "%d %b %Y",
        "%d %B %Y",
    ];
    for fmt in &date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(ParsedDate::Day(d));
        }
    }

    None
}

/// Render a parsed date the way it is stored in cells.
pub fn render_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Render a date with time of day, millisecond precision, `Z` suffix.
pub fn render_timestamp(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Rewrite every non-empty cell of the named columns as a rendered date.
///
/// Columns that are not present are skipped. A value no policy accepts
/// fails the whole file.
pub fn apply_date_policy(
    table: &mut RawTable,
    date_fields: &[String],
    parser: &dyn DateParser,
) -> Result<(), IngestError> {
    for field in date_fields {
        let Some(col) = table.column_index(field) else {
            continue;
        };
        for (row_idx, row) in table.rows.iter_mut().enumerate() {
            let cell = &mut row[col];
            if cell.is_empty() {
                continue;
            }
            let parsed = parser.parse(cell).ok_or_else(|| IngestError::InvalidDate {
                row: row_idx + 1,
                column: field.clone(),
                value: cell.clone(),
            })?;
            *cell = parsed.render();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: &str) -> Option<String> {
        DefaultDateParser.parse(value).map(ParsedDate::render)
    }

    #[test]
    fn widens_partial_dates() {
        assert_eq!(parse("2021").as_deref(), Some("2021-01-01"));
        assert_eq!(parse("2021-06").as_deref(), Some("2021-06-01"));
        assert_eq!(parse("2021-13"), None);
        assert_eq!(parse("21-06-1"), None);
    }

    #[test]
    fn parses_general_formats() {
        assert_eq!(parse("2021-06-15").as_deref(), Some("2021-06-15"));
        assert_eq!(parse("06/15/2021").as_deref(), Some("2021-06-15"));
        assert_eq!(parse("15-Jun-2021").as_deref(), Some("2021-06-15"));
        assert_eq!(parse("15.06.2021").as_deref(), Some("2021-06-15"));
    }

    #[test]
    fn keeps_time_of_day_in_validated_form() {
        assert_eq!(
            parse("2021-06-15T10:30:00.000Z").as_deref(),
            Some("2021-06-15T10:30:00.000Z")
        );
        assert_eq!(
            parse("2021-06-15T10:30:00+02:00").as_deref(),
            Some("2021-06-15T08:30:00.000Z")
        );
        assert_eq!(
            parse("2021-06-15 08:00:00").as_deref(),
            Some("2021-06-15T08:00:00.000Z")
        );
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(parse("spring"), None);
        assert_eq!(parse("abcd"), None);
        assert_eq!(parse("2021-02-30"), None);
    }

    #[test]
    fn policy_rewrites_only_date_columns() {
        let mut table = RawTable {
            headers: vec!["sampleID".to_string(), "collection_date".to_string()],
            rows: vec![
                vec!["2021".to_string(), "2021".to_string()],
                vec!["S2".to_string(), String::new()],
            ],
        };
        apply_date_policy(
            &mut table,
            &["collection_date".to_string(), "run_date".to_string()],
            &DefaultDateParser,
        )
        .expect("dates parse");
        assert_eq!(table.rows[0], vec!["2021", "2021-01-01"]);
        assert_eq!(table.rows[1], vec!["S2", ""]);
    }

    #[test]
    fn policy_fails_whole_file_on_bad_date() {
        let mut table = RawTable {
            headers: vec!["run_date".to_string()],
            rows: vec![vec!["2021-01-01".to_string()], vec!["soon".to_string()]],
        };
        let err = apply_date_policy(&mut table, &["run_date".to_string()], &DefaultDateParser)
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidDate { row: 2, ref value, .. } if value == "soon"
        ));
    }

    #[test]
    fn closures_are_parsers() {
        let fixed = |_: &str| NaiveDate::from_ymd_opt(2000, 1, 1).map(ParsedDate::from);
        assert_eq!(
            fixed.parse("anything").map(ParsedDate::render).as_deref(),
            Some("2000-01-01")
        );
    }
}
