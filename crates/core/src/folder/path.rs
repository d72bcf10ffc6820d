//! Folder path types.

use std::fmt;
use std::str::FromStr;

use lessondrive_shared::FolderId;
use serde::{Deserialize, Serialize};

/// Ordered folder names from the root down, e.g. stage / subject / teacher / lesson.
///
/// Segments are trimmed and blank ones are dropped on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// Build a path from raw segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            segments: segments
                .into_iter()
                .filter_map(|s| {
                    let trimmed = s.as_ref().trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                })
                .collect(),
        }
    }

    /// The standard lesson layout.
    #[must_use]
    pub fn lesson(stage: &str, subject: &str, teacher: &str, lesson: &str) -> Self {
        Self::new([stage, subject, teacher, lesson])
    }

    /// Parse a `/`-separated path.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self::new(path.split('/'))
    }

    /// Append a segment.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self::new(self.segments.iter().map(String::as_str).chain([segment]))
    }

    /// The segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for FolderPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// One folder-creation request: a name under a parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderKey {
    /// Parent folder, `None` for the backend's default root.
    pub parent_id: Option<FolderId>,
    /// Trimmed folder name.
    pub name: String,
}

impl FolderKey {
    /// Create a key.
    #[must_use]
    pub fn new(parent_id: Option<FolderId>, name: impl Into<String>) -> Self {
        Self {
            parent_id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lesson_path() {
        let path = FolderPath::lesson("Stage A", "Subject B", "Teacher C", "Lesson D");
        assert_eq!(
            path.segments(),
            &["Stage A", "Subject B", "Teacher C", "Lesson D"]
        );
        assert_eq!(path.to_string(), "Stage A/Subject B/Teacher C/Lesson D");
    }

    #[test]
    fn test_blank_segments_dropped_and_trimmed() {
        let path = FolderPath::new(["  Stage A ", "", "   ", "Lesson 1"]);
        assert_eq!(path.segments(), &["Stage A", "Lesson 1"]);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_parse() {
        let path: FolderPath = "/Stage A//Math/ ".parse().expect("infallible");
        assert_eq!(path.segments(), &["Stage A", "Math"]);
        assert!(FolderPath::parse(" / ").is_empty());
    }

    #[test]
    fn test_child() {
        let path = FolderPath::parse("Stage A").child(" Math ");
        assert_eq!(path.segments(), &["Stage A", "Math"]);
    }

    #[test]
    fn test_folder_key_equality() {
        let a = FolderKey::new(Some(FolderId::new("p")), "Math");
        let b = FolderKey::new(Some(FolderId::new("p")), "Math");
        let c = FolderKey::new(None, "Math");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    proptest! {
        // No segment survives construction blank or padded.
        #[test]
        fn prop_segments_trimmed_and_non_blank(
            raw in proptest::collection::vec("[ a-zA-Z]{0,8}", 0..8),
        ) {
            let path = FolderPath::new(&raw);
            for segment in path.segments() {
                prop_assert!(!segment.is_empty());
                prop_assert_eq!(segment.trim(), segment.as_str());
            }
            let expected = raw.iter().filter(|s| !s.trim().is_empty()).count();
            prop_assert_eq!(path.len(), expected);
        }
    }
}
