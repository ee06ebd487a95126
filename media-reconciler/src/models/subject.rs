//! Subject documents
//!
//! A subject is one record whose media placement is being reconciled. The
//! record store hands back the full document as an id plus a JSON field map;
//! the engine reads affiliation fields and writes pointer fields, and
//! preserves everything else untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One subject document from the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Stable document id
    pub id: String,
    /// Full field map as stored upstream
    pub fields: Map<String, Value>,
}

impl Subject {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self { id: id.into(), fields }
    }

    /// Display name for logs and reports: `full_name`, then `name`, then id.
    pub fn display_name(&self) -> &str {
        for key in ["full_name", "name"] {
            if let Some(Value::String(s)) = self.fields.get(key) {
                if !s.trim().is_empty() {
                    return s;
                }
            }
        }
        &self.id
    }

    /// Whether a field is present and carries a usable value.
    ///
    /// Upstream documents are loosely typed: an affiliation field may be a
    /// string id, missing, null, or an empty string left behind by a form.
    /// Empty and null are treated as unset.
    pub fn field_is_set(&self, key: &str) -> bool {
        match self.fields.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    /// Whether any of the given field spellings is set.
    pub fn any_field_set(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.field_is_set(k))
    }
}
