//! Tagged value tree for annotation bodies

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A parsed structured-text value.
///
/// Mapping keys are strings and iterate in sorted order, so two equal
/// bodies always serialise identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Sequence(Vec<MetaValue>),
    Mapping(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            MetaValue::Null => "null",
            MetaValue::Bool(_) => "boolean",
            MetaValue::Number(_) => "number",
            MetaValue::String(_) => "string",
            MetaValue::Sequence(_) => "sequence",
            MetaValue::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar text: strings as-is, numbers in canonical form
    pub fn as_text(&self) -> Option<String> {
        match self {
            MetaValue::String(s) => Some(s.clone()),
            MetaValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, MetaValue>> {
        match self {
            MetaValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a dotted path through nested mappings
    pub fn get_path(&self, path: &str) -> Option<&MetaValue> {
        path.split('.')
            .try_fold(self, |value, key| value.as_mapping()?.get(key))
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::String(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::String(s)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str(self.type_name()),
        }
    }
}
