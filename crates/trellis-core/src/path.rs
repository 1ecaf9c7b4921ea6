//! Hierarchical [`DataPath`] addressing for store objects.

use std::fmt;

/// The separator used in the textual form of a path.
pub const PATH_SEPARATOR: char = '/';

/// An ordered list of object names leading from the store root to one
/// object, rendered `a/b/c`.
///
/// A path is a weak reference: resolving it against a `DataStructure`
/// may fail if any segment has been removed or renamed since the path
/// was written down. The empty path never resolves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DataPath {
    segments: Vec<String>,
}

impl DataPath {
    /// A path from explicit segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// A single-segment path addressing a top-level object.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Parse a `a/b/c` string. Empty segments are dropped, so both
    /// `"a//b"` and `"/a/b"` parse as `a/b`.
    pub fn parse(text: &str) -> Self {
        Self {
            segments: text
                .split(PATH_SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// The path's segments, root-first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment: the name of the addressed object.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The path of the addressed object's parent, or `None` for a
    /// top-level (single-segment) or empty path.
    pub fn parent(&self) -> Option<DataPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Extend this path with one more segment.
    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_drops_empty_segments() {
        assert_eq!(DataPath::parse("/a//b/"), DataPath::parse("a/b"));
        assert_eq!(DataPath::parse("a/b").segments(), &["a", "b"]);
    }

    #[test]
    fn parent_of_nested_path() {
        let path = DataPath::parse("a/b/c");
        assert_eq!(path.parent(), Some(DataPath::parse("a/b")));
        assert_eq!(path.name(), Some("c"));
    }

    #[test]
    fn top_level_path_has_no_parent() {
        assert_eq!(DataPath::from_name("a").parent(), None);
        assert_eq!(DataPath::default().parent(), None);
    }

    #[test]
    fn join_appends_segment() {
        let path = DataPath::from_name("a").join("b");
        assert_eq!(path, DataPath::parse("a/b"));
    }

    proptest! {
        #[test]
        fn display_parse_round_trip(
            segments in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 1..5)
        ) {
            let path = DataPath::new(segments);
            prop_assert_eq!(DataPath::parse(&path.to_string()), path);
        }
    }
}
