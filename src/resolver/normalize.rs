//! Entry normalizer
//!
//! Maps every [`Entry`] shape to a uniform [`NormalizedItem`] and drops
//! entries that end up without a name.

use serde::Serialize;
use serde_json::Value;

use crate::core::model::{Entry, EntryRecord};
use crate::core::paths::SEPARATOR;

/// Record `type`/`kind` values that mark a folder
const FOLDER_KINDS: [&str; 2] = ["folder", "directory"];

/// Uniform `{name, isFolder}` shape. `name` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    pub name: String,
    pub is_folder: bool,
}

impl Entry {
    /// Normalize this entry. The result may have an empty name; see
    /// [`normalize_entries`] for the filtering variant.
    pub fn normalize(&self) -> NormalizedItem {
        match self {
            Entry::Name(name) => NormalizedItem {
                name: name.clone(),
                is_folder: looks_like_folder(name),
            },
            Entry::Record(record) => normalize_record(record),
            Entry::Other(text) => NormalizedItem {
                name: text.clone(),
                is_folder: false,
            },
        }
    }
}

/// A path-like string without a file extension, or one ending in '/'
fn looks_like_folder(name: &str) -> bool {
    name.ends_with(SEPARATOR) || (name.contains(SEPARATOR) && !name.contains('.'))
}

fn normalize_record(record: &EntryRecord) -> NormalizedItem {
    let name = record
        .name
        .as_ref()
        .or(record.path.as_ref())
        .or(record.file_name.as_ref())
        .cloned()
        .unwrap_or_default();

    let kind = record.kind.as_deref().unwrap_or_default().to_lowercase();
    let is_folder = record.is_folder || FOLDER_KINDS.contains(&kind.as_str());

    NormalizedItem { name, is_folder }
}

/// Normalize raw listing entries, discarding empty names
pub fn normalize_entries(entries: &[Value]) -> Vec<NormalizedItem> {
    entries
        .iter()
        .map(|value| Entry::from(value).normalize())
        .filter(|item| !item.name.is_empty())
        .collect()
}
