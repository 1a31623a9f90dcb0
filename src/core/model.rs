//! Unified Result Model
//!
//! Raw backend entries are parsed into [`Entry`] and every command renders a
//! [`ResultSet`] of `{name, isFolder}` items.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw item from a backend listing
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A bare name, possibly a nested path
    Name(String),
    /// A structured record
    Record(EntryRecord),
    /// Anything else, coerced to its string form
    Other(String),
}

/// Fields a listing record may carry. Absent or empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryRecord {
    pub name: Option<String>,
    pub path: Option<String>,
    pub file_name: Option<String>,
    pub kind: Option<String>,
    pub is_folder: bool,
}

impl From<&Value> for Entry {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => Entry::Name(s.clone()),
            Value::Object(map) => Entry::Record(EntryRecord {
                name: map.get("name").and_then(name_text),
                path: map.get("path").and_then(name_text),
                file_name: map.get("fileName").and_then(name_text),
                // `type` wins over `kind` unless it is falsy
                kind: map
                    .get("type")
                    .and_then(kind_text)
                    .or_else(|| map.get("kind").and_then(kind_text)),
                is_folder: map.get("isFolder").map(is_truthy).unwrap_or(false),
            }),
            other => Entry::Other(coerce_to_string(other)),
        }
    }
}

/// A name field only counts when it is a non-empty string.
fn name_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Text of a truthy `type`/`kind` field, `None` when falsy.
fn kind_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    Some(coerce_to_string(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form of a non-string, non-record entry.
fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => js_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Number text without a trailing `.0` on integral floats
fn js_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

/// A display result: a file, or a folder collapsed from its files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub name: String,
    pub is_folder: bool,
}

impl ResultItem {
    /// Create a new file result
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
        }
    }

    /// Create a new folder result
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
        }
    }

    /// Label of the action offered for this result
    pub fn action_label(&self) -> &'static str {
        if self.is_folder {
            "Download ZIP"
        } else {
            "Download"
        }
    }
}

/// Ordered result set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names in display order
    #[cfg(test)]
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name.as_str()).collect()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
