//! Remote path helpers
//!
//! Remote names use '/' as separator. Segment splitting also accepts '\\' so
//! names uploaded from Windows clients resolve to the same root.

/// Separator used by remote names
pub const SEPARATOR: char = '/';

/// Base name used when a folder path has no usable segment
pub const DEFAULT_FOLDER_NAME: &str = "folder";

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\'])
}

/// Whether a name points inside a folder
pub fn is_nested(name: &str) -> bool {
    name.contains(SEPARATOR)
}

/// First non-empty segment of `path` followed by '/', if any
pub fn root_folder(path: &str) -> Option<String> {
    segments(path)
        .find(|s| !s.is_empty())
        .map(|first| format!("{}{}", first, SEPARATOR))
}

/// Last segment of `path`; for a trailing separator, the segment before it
pub fn base_name(path: &str) -> String {
    let parts: Vec<&str> = segments(path).collect();
    let last = parts.last().copied().unwrap_or_default();
    if !last.is_empty() {
        return last.to_string();
    }
    if parts.len() > 1 {
        parts[parts.len() - 2].to_string()
    } else {
        DEFAULT_FOLDER_NAME.to_string()
    }
}

/// Folder prefix with exactly one trailing separator
pub fn folder_prefix(root: &str) -> String {
    format!("{}{}", root.trim_end_matches(SEPARATOR), SEPARATOR)
}

/// Archive name for a folder prefix
pub fn zip_name(prefix: &str) -> String {
    let trimmed = prefix.strip_suffix(SEPARATOR).unwrap_or(prefix);
    let base = base_name(trimmed);
    if base.is_empty() {
        format!("{}.zip", DEFAULT_FOLDER_NAME)
    } else {
        format!("{}.zip", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_nested() {
        assert!(is_nested("cs101/hw1.pdf"));
        assert!(!is_nested("standalone.txt"));
        assert!(!is_nested("win\\path.txt"));
    }

    #[test]
    fn test_root_folder() {
        assert_eq!(root_folder("cs101/hw1.pdf"), Some("cs101/".to_string()));
        assert_eq!(root_folder("/cs101/a/b"), Some("cs101/".to_string()));
        assert_eq!(root_folder("docs\\a.txt"), Some("docs/".to_string()));
        assert_eq!(root_folder("plain.txt"), Some("plain.txt/".to_string()));
    }

    #[test]
    fn test_root_folder_empty() {
        assert_eq!(root_folder(""), None);
        assert_eq!(root_folder("/"), None);
        assert_eq!(root_folder("//"), None);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/c.txt"), "c.txt");
        assert_eq!(base_name("a/b/"), "b");
        assert_eq!(base_name("cs101"), "cs101");
        assert_eq!(base_name(""), DEFAULT_FOLDER_NAME);
    }

    #[test]
    fn test_folder_prefix() {
        assert_eq!(folder_prefix("cs101"), "cs101/");
        assert_eq!(folder_prefix("cs101/"), "cs101/");
        assert_eq!(folder_prefix("cs101//"), "cs101/");
    }

    #[test]
    fn test_zip_name() {
        assert_eq!(zip_name("cs101/"), "cs101.zip");
        assert_eq!(zip_name("a/b/"), "b.zip");
        assert_eq!(zip_name("/"), "folder.zip");
    }
}
