//! Drive search query construction.

use lessondrive_core::storage::{FOLDER_MIME_TYPE, FolderQuery};
use lessondrive_shared::FolderId;

/// Escape a value for use inside a single-quoted Drive query literal.
#[must_use]
pub fn escape_query_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '\'') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Alias Drive accepts for the user's My Drive root.
pub const ROOT_ALIAS: &str = "root";

/// Build the `q` parameter for a folder lookup.
///
/// A query without a parent is scoped to [`ROOT_ALIAS`], matching where
/// `create_folder` puts parentless folders.
#[must_use]
pub fn folder_query(query: &FolderQuery) -> String {
    let mut q = format!(
        "name = '{}' and mimeType = '{FOLDER_MIME_TYPE}'",
        escape_query_value(&query.name)
    );
    if !query.include_trashed {
        q.push_str(" and trashed = false");
    }
    let parent = query.parent_id.as_ref().map_or(ROOT_ALIAS, FolderId::as_str);
    q.push_str(&format!(" and '{}' in parents", escape_query_value(parent)));
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Lesson 1", "Lesson 1")]
    #[case("Teacher's notes", "Teacher\\'s notes")]
    #[case(r"a\b", r"a\\b")]
    #[case(r"it\'s", r"it\\\'s")]
    fn test_escape_query_value(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_query_value(raw), expected);
    }

    #[test]
    fn test_folder_query_with_parent() {
        let q = folder_query(&FolderQuery::new("Math", Some(FolderId::new("p1"))));
        assert_eq!(
            q,
            "name = 'Math' and mimeType = 'application/vnd.google-apps.folder' \
             and trashed = false and 'p1' in parents"
        );
    }

    #[test]
    fn test_folder_query_without_parent_is_scoped_to_root() {
        let q = folder_query(&FolderQuery::new("O'Brien", None));
        assert_eq!(
            q,
            "name = 'O\\'Brien' and mimeType = 'application/vnd.google-apps.folder' \
             and trashed = false and 'root' in parents"
        );
    }

    #[test]
    fn test_folder_query_including_trashed() {
        let mut query = FolderQuery::new("Math", None);
        query.include_trashed = true;
        let q = folder_query(&query);
        assert!(!q.contains("trashed"));
        assert!(q.ends_with("and 'root' in parents"));
    }
}
