//! Cell validation for sample metadata tables.
//!
//! Validation never fails; it only collects issues. Issues come out in
//! row-major order, then column order, and within one cell in check order
//! (date, enum, int, float).

pub mod checks;

pub use checks::{CellCheck, DateCheck, EnumCheck, FloatCheck, IntCheck};

use tracing::debug;

use mgm_model::{FieldSpec, SchemaRegistry, Table, ValidationIssue};

pub struct Validator {
    checks: Vec<Box<dyn CellCheck>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            checks: vec![
                Box::new(DateCheck),
                Box::new(EnumCheck),
                Box::new(IntCheck),
                Box::new(FloatCheck),
            ],
        }
    }
}

impl Validator {
    pub fn new(checks: Vec<Box<dyn CellCheck>>) -> Self {
        Self { checks }
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    pub fn validate_table(&self, table: &Table, registry: &SchemaRegistry) -> Vec<ValidationIssue> {
        // Resolve applicable checks once per column; columns outside the
        // schema are not checked.
        let plan: Vec<Option<(&FieldSpec, Vec<&dyn CellCheck>)>> = table
            .columns
            .iter()
            .map(|column| {
                let spec = registry.spec(column).ok()?;
                let checks: Vec<&dyn CellCheck> = self
                    .checks
                    .iter()
                    .map(|check| &**check)
                    .filter(|check| check.applies_to(spec, registry))
                    .collect();
                Some((spec, checks))
            })
            .collect();

        let mut issues = Vec::new();
        for (row_idx, row) in table.rows.iter().enumerate() {
            for (cell, entry) in row.cells.iter().zip(&plan) {
                let Some((spec, checks)) = entry else {
                    continue;
                };
                if cell.is_empty() {
                    continue;
                }
                issues.extend(
                    checks
                        .iter()
                        .filter_map(|check| check.check(row_idx + 1, spec, cell)),
                );
            }
        }
        debug!(rows = table.len(), issues = issues.len(), "table validated");
        issues
    }
}

/// Validate with the standard checks.
pub fn validate_table(table: &Table, registry: &SchemaRegistry) -> Vec<ValidationIssue> {
    Validator::default().validate_table(table, registry)
}
