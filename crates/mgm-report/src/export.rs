use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::WriterBuilder;
use tracing::debug;

use mgm_model::Table;

use crate::error::ExportError;

/// Render a table as UTF-8 CSV: header row in table column order, then one
/// record per row.
pub fn export_csv(table: &Table) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(&row.cells)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

/// Keep user names usable as a file name component.
pub fn sanitize_user_name(user: &str) -> String {
    let cleaned: String = user
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "anonymous".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `<user>_<YYYY-MM-DD-HH-MM-SS>.csv`
pub fn export_file_name(user: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}.csv",
        sanitize_user_name(user),
        timestamp.format("%Y-%m-%d-%H-%M-%S")
    )
}

/// Write the export into `dir`, replacing any file of the same name.
pub fn write_export(dir: &Path, file_name: &str, csv_text: &str) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name);
    fs::write(&path, csv_text).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), bytes = csv_text.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mgm_model::Row;

    use super::*;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap()
    }

    #[test]
    fn file_name_carries_user_and_timestamp() {
        assert_eq!(
            export_file_name("alice", timestamp()),
            "alice_2024-03-09-07-05-01.csv"
        );
        assert_eq!(
            export_file_name("../bob smith", timestamp()),
            "_bob_smith_2024-03-09-07-05-01.csv"
        );
        assert_eq!(export_file_name("  ", timestamp()), "anonymous_2024-03-09-07-05-01.csv");
    }

    #[test]
    fn quotes_cells_that_need_it() {
        let mut table = Table::new(vec!["sampleID".into(), "notes".into()]);
        table
            .push_row(Row::new(vec!["S1".into(), "a; b, \"c\"".into()]))
            .unwrap();
        table.push_row(Row::new(vec!["S2".into(), String::new()])).unwrap();
        assert_eq!(
            export_csv(&table).unwrap(),
            "sampleID,notes\nS1,\"a; b, \"\"c\"\"\"\nS2,\n"
        );
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_export(dir.path(), "a.csv", "x\n1\n").unwrap();
        let second = write_export(dir.path(), "a.csv", "x\n2\n").unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(second).unwrap(), "x\n2\n");
    }
}
