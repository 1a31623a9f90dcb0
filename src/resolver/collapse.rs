//! Folder collapser
//!
//! Nested names are represented by their root folder, emitted once at the
//! position of the first name under it. Plain names pass through.

use std::collections::HashSet;

use crate::core::model::{ResultItem, ResultSet};
use crate::core::paths::{is_nested, root_folder};

/// Collapse ranked names into display results
pub fn collapse_folders<I, S>(names: I) -> ResultSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut results = ResultSet::new();

    for name in names {
        let name = name.as_ref();
        if !is_nested(name) {
            results.push(ResultItem::file(name));
            continue;
        }

        let Some(root) = root_folder(name) else {
            continue;
        };
        if seen.insert(root.clone()) {
            results.push(ResultItem::folder(root));
        }
    }

    results
}
