//! Cell normalization.
//!
//! Every cell goes through the same cleanup (whitespace runs collapsed,
//! separator characters trimmed from the ends, commas rewritten to `"; "`),
//! followed by any rewrites registered for its field. Rules are applied
//! until the value stops changing, so normalizing twice is a no-op.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use mgm_model::{CorrectionRecord, Table};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static COMMA_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*(\S)").expect("Invalid comma separator regex"));

static BARE_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\S)").expect("Invalid colon regex"));

const EDGE_CHARS: &[char] = &[',', ';', ' '];

/// A field-specific rewrite of an already cleaned value.
pub type FieldRule = fn(&str) -> String;

/// `Country:Region` → `Country: Region`.
fn space_after_colon(value: &str) -> String {
    BARE_COLON.replace_all(value, ": $1").into_owned()
}

/// First character upper case, the rest lower case.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn yes_no_flag(value: &str) -> String {
    if value.eq_ignore_ascii_case("yes") {
        "y".to_string()
    } else if value.eq_ignore_ascii_case("no") {
        "n".to_string()
    } else {
        value.to_string()
    }
}

fn clean(value: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(value, " ");
    let trimmed = collapsed.trim_matches(EDGE_CHARS);
    COMMA_SEPARATOR.replace_all(trimmed, "; $1").into_owned()
}

/// Cleanup plus a table of per-field rewrites.
#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: BTreeMap<String, Vec<FieldRule>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::empty()
            .with_rule("locality", space_after_colon)
            .with_rule("source_type", capitalize)
            .with_rule("if_repeated", yes_no_flag)
    }
}

impl Normalizer {
    /// Cleanup only, no field rewrites.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Register a rewrite for `field`; rules for one field run in the
    /// order they were added.
    pub fn with_rule(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.entry(field.into()).or_default().push(rule);
        self
    }

    pub fn has_rules_for(&self, field: &str) -> bool {
        self.rules.contains_key(field)
    }

    fn apply_once(&self, field: &str, value: &str) -> String {
        let mut out = clean(value);
        if let Some(rules) = self.rules.get(field) {
            for rule in rules {
                out = rule(&out);
            }
        }
        out
    }

    /// Normalize one cell of `field`.
    pub fn normalize_cell(&self, field: &str, value: &str) -> String {
        let mut current = self.apply_once(field, value);
        // Each further pass either changes nothing or removes a comma.
        loop {
            let next = self.apply_once(field, &current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Rewrite every cell in place and return one record per changed cell,
    /// in row-major order with 1-based rows.
    pub fn normalize_table(&self, table: &mut Table) -> Vec<CorrectionRecord> {
        let mut corrections = Vec::new();
        for (row_idx, row) in table.rows.iter_mut().enumerate() {
            for (field, cell) in table.columns.iter().zip(row.cells.iter_mut()) {
                if cell.is_empty() {
                    continue;
                }
                let after = self.normalize_cell(field, cell);
                if after != *cell {
                    let before = std::mem::replace(cell, after.clone());
                    corrections.push(CorrectionRecord {
                        row: row_idx + 1,
                        field: field.clone(),
                        before,
                        after,
                    });
                }
            }
        }
        debug!(corrections = corrections.len(), "table normalized");
        corrections
    }
}

/// Normalize one cell with the default rewrites.
pub fn normalize_cell(field: &str, value: &str) -> String {
    Normalizer::default().normalize_cell(field, value)
}

/// Normalize a table with the default rewrites.
pub fn normalize_table(table: &mut Table) -> Vec<CorrectionRecord> {
    Normalizer::default().normalize_table(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_whitespace_and_separators() {
        assert_eq!(normalize_cell("notes", "  a   b \t c "), "a b c");
        assert_eq!(normalize_cell("notes", ",;a;, "), "a");
        assert_eq!(normalize_cell("notes", "x,y ,  z"), "x; y; z");
        assert_eq!(normalize_cell("notes", "a,,b"), "a; ; b");
        assert_eq!(normalize_cell("notes", ""), "");
    }

    #[test]
    fn field_rewrites() {
        assert_eq!(normalize_cell("locality", "Canada:Ontario"), "Canada: Ontario");
        assert_eq!(normalize_cell("locality", "Canada: Ontario"), "Canada: Ontario");
        assert_eq!(normalize_cell("locality", "Lab:"), "Lab:");
        assert_eq!(normalize_cell("source_type", "sOIL"), "Soil");
        assert_eq!(normalize_cell("source_type", "host-Associated"), "Host-associated");
        assert_eq!(normalize_cell("if_repeated", "Yes"), "y");
        assert_eq!(normalize_cell("if_repeated", "NO"), "n");
        assert_eq!(normalize_cell("if_repeated", "maybe"), "maybe");
        // rewrites stay with their field
        assert_eq!(normalize_cell("notes", "yes"), "yes");
    }

    #[test]
    fn custom_rules_extend_the_table() {
        let normalizer = Normalizer::empty().with_rule("target_gene", |v: &str| v.to_uppercase());
        assert!(normalizer.has_rules_for("target_gene"));
        assert!(!normalizer.has_rules_for("source_type"));
        assert_eq!(normalizer.normalize_cell("target_gene", " 16s "), "16S");
        assert_eq!(normalizer.normalize_cell("source_type", "soil"), "soil");
    }
}
