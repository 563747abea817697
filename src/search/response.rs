//! Upstream response payload.
//!
//! Documents are schema-less on the wire. [`Document`] wraps the raw JSON
//! object and only hands out values that are actually present: absent keys,
//! `null`, empty strings, empty lists, `false` and zero all read as `None`.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Deserialized search payload. Every region defaults when missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub response: ResultSet,
    #[serde(default)]
    pub facet_counts: FacetCounts,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultSet {
    #[serde(default, rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<Document>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacetCounts {
    /// Field name to a flat `[value, count, value, count, ...]` array.
    #[serde(default)]
    pub facet_fields: IndexMap<String, Value>,
}

impl SearchResponse {
    pub fn docs(&self) -> &[Document] {
        &self.response.docs
    }

    pub fn num_found(&self) -> u64 {
        self.response.num_found
    }

    pub fn facet_fields(&self) -> &IndexMap<String, Value> {
        &self.facet_counts.facet_fields
    }

    /// True when `field` is a facet array with at least one entry.
    pub fn has_facet_entries(&self, field: &str) -> bool {
        matches!(
            self.facet_counts.facet_fields.get(field),
            Some(Value::Array(entries)) if !entries.is_empty()
        )
    }

    /// `(value, count)` pairs of a facet field, read from at most the first
    /// `max_entries` array entries. A trailing value without a count is
    /// dropped.
    pub fn facet_pairs(&self, field: &str, max_entries: usize) -> Vec<(String, String)> {
        let Some(Value::Array(entries)) = self.facet_counts.facet_fields.get(field) else {
            return Vec::new();
        };

        entries[..entries.len().min(max_entries)]
            .chunks_exact(2)
            .map(|pair| (display_value(&pair[0]), display_value(&pair[1])))
            .collect()
    }
}

/// A present, non-empty document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Scalar(String),
    List(Vec<&'a Value>),
}

impl FieldValue<'_> {
    /// Render for display: a scalar as-is, a list as its first `limit`
    /// items joined with `", "`.
    pub fn render(&self, limit: usize) -> String {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::List(items) => items
                .iter()
                .take(limit)
                .map(|item| display_value(item))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Optional-field view over one result document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// The field if it is present and non-empty.
    pub fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        let value = self.0.get(key)?;
        if is_blank(value) {
            return None;
        }
        match value {
            Value::Array(items) => Some(FieldValue::List(items.iter().collect())),
            other => Some(FieldValue::Scalar(display_value(other))),
        }
    }

    /// The field rendered as text. Lists are joined in full.
    pub fn text(&self, key: &str) -> Option<String> {
        self.field(key).map(|value| value.render(usize::MAX))
    }

    /// The field's items when it is a non-empty list.
    pub fn list(&self, key: &str) -> Option<Vec<&Value>> {
        match self.field(key)? {
            FieldValue::List(items) => Some(items),
            FieldValue::Scalar(_) => None,
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

/// Strings without quotes, everything else in its JSON form.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
