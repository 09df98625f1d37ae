use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::SchemaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    /// Passed through to a downstream system untouched; never part of a
    /// decoded record.
    Datetime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub canonical: String,
    pub display: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Immutable field mapping with lookups in both directions. Built once at
/// load and shared read-only for the process lifetime.
#[derive(Clone, Debug)]
pub struct FieldSchema {
    specs: Vec<FieldSpec>,
    by_canonical: HashMap<String, usize>,
    by_display: HashMap<String, usize>,
}

impl FieldSchema {
    pub fn new(specs: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let mut by_canonical = HashMap::with_capacity(specs.len());
        let mut by_display = HashMap::with_capacity(specs.len());
        for (idx, spec) in specs.iter().enumerate() {
            if by_canonical.insert(spec.canonical.clone(), idx).is_some() {
                return Err(SchemaError::duplicate_canonical(&spec.canonical));
            }
            if by_display.insert(spec.display.clone(), idx).is_some() {
                return Err(SchemaError::duplicate_display(&spec.display));
            }
        }
        Ok(Self {
            specs,
            by_canonical,
            by_display,
        })
    }

    pub fn empty() -> Self {
        Self {
            specs: Vec::new(),
            by_canonical: HashMap::new(),
            by_display: HashMap::new(),
        }
    }

    /// Builds an encode-side schema from the field map the backend returns
    /// alongside each collection (`{"fields": {key: {"display": ..}}}`).
    /// Entries without a display string contribute nothing; the raw key then
    /// passes through encoding unchanged. Types default to `String` because
    /// the encode path never coerces.
    pub fn from_backend_fields(fields: &Map<String, Value>) -> Result<Self, SchemaError> {
        let specs = fields
            .iter()
            .filter_map(|(key, meta)| {
                let display = meta.get("display")?.as_str()?;
                Some(FieldSpec {
                    canonical: key.clone(),
                    display: display.to_string(),
                    field_type: FieldType::String,
                })
            })
            .collect();
        Self::new(specs)
    }

    pub fn lookup_by_canonical(&self, key: &str) -> Option<&FieldSpec> {
        self.by_canonical.get(key).map(|idx| &self.specs[*idx])
    }

    pub fn lookup_by_display(&self, name: &str) -> Option<&FieldSpec> {
        self.by_display.get(name).map(|idx| &self.specs[*idx])
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
