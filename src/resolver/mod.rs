//! Result resolver - turns a raw listing and a query into display results
//!
//! Stages, each pure:
//! - unwrap: pull the entry array out of the response
//! - normalize: uniform `{name, isFolder}` items
//! - rank: token AND-filter and positional scoring (see `core::tokenizer`)
//! - collapse: one result per root folder

pub mod collapse;
pub mod normalize;
pub mod unwrap;

use serde_json::Value;

use crate::core::model::ResultSet;
use crate::core::tokenizer::filter_and_rank;

pub use collapse::collapse_folders;
pub use normalize::normalize_entries;
pub use unwrap::extract_entries;

/// Which user action produced the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTrigger {
    /// Explicit search (button or Enter). A blank query lists everything.
    Submit,
    /// Debounced as-you-type search. A blank query yields nothing.
    Keystroke,
}

/// Resolve a raw response with submit semantics
pub fn rank_and_group(raw: &Value, query: &str) -> ResultSet {
    rank_and_group_for(SearchTrigger::Submit, raw, query)
}

/// Resolve a raw response for the given trigger path
pub fn rank_and_group_for(trigger: SearchTrigger, raw: &Value, query: &str) -> ResultSet {
    let trimmed = query.trim();
    if trimmed.is_empty() && trigger == SearchTrigger::Keystroke {
        return ResultSet::new();
    }

    let names: Vec<String> = normalize_entries(extract_entries(raw))
        .into_iter()
        .map(|item| item.name)
        .collect();

    let ordered = if trimmed.is_empty() {
        names
    } else {
        filter_and_rank(&names, trimmed)
    };

    tracing::debug!(
        ?trigger,
        query = trimmed,
        matched = ordered.len(),
        "ranked listing"
    );
    collapse_folders(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ResultItem;
    use serde_json::json;

    fn listing() -> Value {
        json!({
            "notes": [
                "cs101/hw1.pdf",
                {"name": "final_report.pdf"},
                {"path": "report_final.pdf", "type": "file"},
                "cs101/hw2_report.pdf",
                {"fileName": "", "kind": "folder"},
                "lab1_report.pdf",
                "lab2_report.pdf"
            ]
        })
    }

    #[test]
    fn test_rank_and_group_orders_and_collapses() {
        let out = rank_and_group(&listing(), "report");
        assert_eq!(
            out.names(),
            vec![
                "report_final.pdf",
                "lab1_report.pdf",
                "lab2_report.pdf",
                "final_report.pdf",
                "cs101/"
            ]
        );
        assert_eq!(out.items.last(), Some(&ResultItem::folder("cs101/")));
    }

    #[test]
    fn test_and_semantics_through_pipeline() {
        let out = rank_and_group(&listing(), "lab 2");
        assert_eq!(out.names(), vec!["lab2_report.pdf"]);
    }

    #[test]
    fn test_submit_blank_query_lists_everything() {
        let out = rank_and_group(&listing(), "   ");
        assert_eq!(
            out.names(),
            vec![
                "cs101/",
                "final_report.pdf",
                "report_final.pdf",
                "lab1_report.pdf",
                "lab2_report.pdf"
            ]
        );
    }

    #[test]
    fn test_keystroke_blank_query_lists_nothing() {
        let out = rank_and_group_for(SearchTrigger::Keystroke, &listing(), "  ");
        assert!(out.is_empty());
    }

    #[test]
    fn test_triggers_agree_on_non_blank_query() {
        let raw = listing();
        assert_eq!(
            rank_and_group_for(SearchTrigger::Submit, &raw, "hw"),
            rank_and_group_for(SearchTrigger::Keystroke, &raw, "hw")
        );
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let raw = listing();
        let first = rank_and_group(&raw, "report pdf");
        let second = rank_and_group(&raw, "report pdf");
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_string_record_names_are_skipped() {
        let out = rank_and_group(&json!([{"name": 0, "path": "real.pdf"}]), "");
        assert_eq!(out.names(), vec!["real.pdf"]);

        let out = rank_and_group(&json!([{"name": 5}, {"name": true}, "ok.txt"]), "");
        assert_eq!(out.names(), vec!["ok.txt"]);
    }

    #[test]
    fn test_malformed_response_is_empty() {
        assert!(rank_and_group(&json!({"error": "boom"}), "").is_empty());
        assert!(rank_and_group(&json!("nope"), "x").is_empty());
    }
}
