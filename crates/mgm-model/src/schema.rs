//! Field schema for sample metadata tables.
//!
//! The registry is built once per process and is read-only afterwards. Its
//! field order is the canonical column order for ingestion, validation and
//! export.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Fields treated as dates even when the schema types them as plain strings.
pub const DEFAULT_DATE_FIELDS: &[&str] = &["collection_date", "run_date"];

/// Identifier field cleared when a row is duplicated.
pub const PRIMARY_FIELD: &str = "sampleID";

/// Cell data type declared by the schema.
///
/// Cells are always carried as text; the type only selects which checks the
/// validator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum DataType {
    String,
    Int,
    Float,
    Date,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Date => "date",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "str" | "text" => Ok(DataType::String),
            "int" | "integer" => Ok(DataType::Int),
            "float" | "double" => Ok(DataType::Float),
            "date" => Ok(DataType::Date),
            _ => Err(format!("unrecognized data type: {s}")),
        }
    }
}

/// Whether a field accepts free text or a fixed set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceKind {
    #[default]
    Free,
    Fixed,
}

impl FromStr for ChoiceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "free" => Ok(ChoiceKind::Free),
            "fix" | "fixed" => Ok(ChoiceKind::Fixed),
            _ => Err(format!("unrecognized choice kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub data_type: DataType,
    pub choice_kind: ChoiceKind,
    /// Allowed values in schema order. Empty for free-text fields.
    #[serde(default)]
    pub allowed_values: Vec<String>,
}

impl FieldSpec {
    pub fn free(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            choice_kind: ChoiceKind::Free,
            allowed_values: Vec::new(),
        }
    }

    pub fn fixed<I, S>(name: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            data_type: DataType::String,
            choice_kind: ChoiceKind::Fixed,
            allowed_values: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the validator must check membership in `allowed_values`.
    pub fn is_enumerated(&self) -> bool {
        self.choice_kind == ChoiceKind::Fixed && !self.allowed_values.is_empty()
    }

    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values.iter().any(|allowed| allowed == value)
    }
}

/// Ordered, immutable set of field specs.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    specs: Vec<FieldSpec>,
    names: Vec<String>,
    index: BTreeMap<String, usize>,
    fingerprint: Option<String>,
}

impl SchemaRegistry {
    pub fn from_specs(specs: Vec<FieldSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(ModelError::EmptySchema);
        }
        let mut index = BTreeMap::new();
        for (position, spec) in specs.iter().enumerate() {
            if index.insert(spec.name.clone(), position).is_some() {
                return Err(ModelError::DuplicateField(spec.name.clone()));
            }
        }
        let names = specs.iter().map(|spec| spec.name.clone()).collect();
        Ok(Self {
            specs,
            names,
            index,
            fingerprint: None,
        })
    }

    /// Attach a digest of the source the registry was loaded from.
    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Canonical column order.
    pub fn fields(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    pub fn spec(&self, name: &str) -> Result<&FieldSpec> {
        self.index
            .get(name)
            .map(|&position| &self.specs[position])
            .ok_or_else(|| ModelError::UnknownField(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn is_date_field(&self, name: &str) -> bool {
        DEFAULT_DATE_FIELDS.contains(&name)
            || self
                .spec(name)
                .map(|spec| spec.data_type == DataType::Date)
                .unwrap_or(false)
    }

    /// Fields parsed and checked as dates, in schema order.
    pub fn date_fields(&self) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| self.is_date_field(name))
            .cloned()
            .collect()
    }

    /// Field reset to empty on a duplicated row.
    pub fn primary_field(&self) -> &str {
        if self.contains(PRIMARY_FIELD) {
            PRIMARY_FIELD
        } else {
            &self.names[0]
        }
    }
}
