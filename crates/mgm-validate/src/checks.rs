//! Individual cell checks.
//!
//! Cells stay text everywhere else; this is the only place that looks at
//! what a value means. Empty cells always pass.

use std::sync::LazyLock;

use regex::Regex;

use mgm_model::{DataType, FieldSpec, SchemaRegistry, ValidationIssue};

/// `YYYY-MM-DD`, optionally with a millisecond UTC time part.
static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}:\d{2}\.\d{3}Z)?$").expect("Invalid date regex")
});

/// One kind of per-cell rule.
pub trait CellCheck {
    fn name(&self) -> &'static str;

    /// Whether the check runs on cells of `spec` at all.
    fn applies_to(&self, spec: &FieldSpec, registry: &SchemaRegistry) -> bool;

    /// Check a non-empty cell. `row` is 1-based.
    fn check(&self, row: usize, spec: &FieldSpec, value: &str) -> Option<ValidationIssue>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateCheck;

impl CellCheck for DateCheck {
    fn name(&self) -> &'static str {
        "date"
    }

    fn applies_to(&self, spec: &FieldSpec, registry: &SchemaRegistry) -> bool {
        registry.is_date_field(&spec.name)
    }

    fn check(&self, row: usize, spec: &FieldSpec, value: &str) -> Option<ValidationIssue> {
        (!DATE_REGEX.is_match(value)).then(|| ValidationIssue::InvalidDate {
            row,
            field: spec.name.clone(),
            raw: value.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnumCheck;

impl CellCheck for EnumCheck {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn applies_to(&self, spec: &FieldSpec, _registry: &SchemaRegistry) -> bool {
        spec.is_enumerated()
    }

    fn check(&self, row: usize, spec: &FieldSpec, value: &str) -> Option<ValidationIssue> {
        (!spec.allows(value)).then(|| ValidationIssue::InvalidEnum {
            row,
            field: spec.name.clone(),
            raw: value.to_string(),
            allowed: spec.allowed_values.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntCheck;

impl CellCheck for IntCheck {
    fn name(&self) -> &'static str {
        "int"
    }

    fn applies_to(&self, spec: &FieldSpec, _registry: &SchemaRegistry) -> bool {
        spec.data_type == DataType::Int
    }

    fn check(&self, row: usize, spec: &FieldSpec, value: &str) -> Option<ValidationIssue> {
        (!value.bytes().all(|b| b.is_ascii_digit())).then(|| ValidationIssue::InvalidInt {
            row,
            field: spec.name.clone(),
            raw: value.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatCheck;

impl CellCheck for FloatCheck {
    fn name(&self) -> &'static str {
        "float"
    }

    fn applies_to(&self, spec: &FieldSpec, _registry: &SchemaRegistry) -> bool {
        spec.data_type == DataType::Float
    }

    fn check(&self, row: usize, spec: &FieldSpec, value: &str) -> Option<ValidationIssue> {
        value
            .parse::<f64>()
            .is_err()
            .then(|| ValidationIssue::InvalidFloat {
                row,
                field: spec.name.clone(),
                raw: value.to_string(),
            })
    }
}
