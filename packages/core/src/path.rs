//! Path type with normalized, storable segments.

use std::fmt;

/// Errors related to path parsing and key translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A path segment that cannot appear in a stored key.
    InvalidSegment {
        segment: String,
        position: usize,
        message: String,
    },
    /// A key that does not map to any path under the configured prefix.
    ForeignKey { key: String },
    /// A key whose encoding is not the canonical form `as_key` produces.
    NonCanonicalKey { key: String, message: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidSegment {
                segment,
                position,
                message,
            } => {
                write!(
                    f,
                    "invalid path segment '{}' at position {}: {}",
                    segment, position, message
                )
            }
            PathError::ForeignKey { key } => {
                write!(f, "key '{}' is outside the configured prefix", key)
            }
            PathError::NonCanonicalKey { key, message } => {
                write!(f, "key '{}' is not canonically encoded: {}", key, message)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A normalized path relative to the store root.
///
/// Segments are separated by `/`; leading, trailing, and doubled
/// delimiters are dropped during parsing, so `"a//b/"` and `"/a/b"` both
/// normalize to `a/b`. The empty path is the store root. Segments may be
/// any non-empty Unicode string except `.` and `..`, which would not
/// survive a round-trip through normalization.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The store root.
    pub fn root() -> Self {
        Path {
            segments: Vec::new(),
        }
    }

    /// Parse a path string, normalizing delimiters and validating
    /// segments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatfs_core::Path;
    ///
    /// let path = Path::parse("notes/2026/plan.md").unwrap();
    /// assert_eq!(path.len(), 3);
    ///
    /// // Leading and trailing slashes are normalized away
    /// assert_eq!(Path::parse("/notes/").unwrap(), Path::parse("notes").unwrap());
    ///
    /// // The empty string is the store root
    /// assert!(Path::parse("").unwrap().is_root());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let segments: Vec<String> = s
            .split('/')
            .filter(|seg| !seg.is_empty())
            .map(|seg| seg.to_string())
            .collect();

        for (i, segment) in segments.iter().enumerate() {
            Self::validate_segment(segment, i)?;
        }

        Ok(Path { segments })
    }

    /// Create a path from pre-split segments, validating each.
    pub fn from_segments(segments: Vec<String>) -> Result<Self, PathError> {
        for (i, segment) in segments.iter().enumerate() {
            Self::validate_segment(segment, i)?;
        }
        Ok(Path { segments })
    }

    fn validate_segment(segment: &str, position: usize) -> Result<(), PathError> {
        if segment.is_empty() {
            return Err(PathError::InvalidSegment {
                segment: segment.to_string(),
                position,
                message: "empty segment".to_string(),
            });
        }

        if segment == "." || segment == ".." {
            return Err(PathError::InvalidSegment {
                segment: segment.to_string(),
                position,
                message: "relative segment does not survive normalization".to_string(),
            });
        }

        Ok(())
    }

    /// Check if this path is the store root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root path (which has no segments).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate over segments.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.as_str())
    }

    /// The first segment, if any.
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(|s| s.as_str())
    }

    /// The last segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    /// Join this path with another.
    #[must_use]
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Path { segments }
    }

    /// Append a single segment, validating it.
    pub fn child(&self, segment: &str) -> Result<Path, PathError> {
        Self::validate_segment(segment, self.segments.len())?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Path { segments })
    }

    /// Check if this path starts with the given segment prefix.
    ///
    /// This is segment-wise: `a/bc` does not have prefix `a/b`.
    pub fn has_prefix(&self, prefix: &Path) -> bool {
        prefix.segments.len() <= self.segments.len()
            && prefix.segments == self.segments[..prefix.segments.len()]
    }

    /// Strip a segment prefix from this path.
    ///
    /// Returns `None` if the prefix doesn't match.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Path) -> Option<Path> {
        if self.has_prefix(prefix) {
            Some(Path {
                segments: self.segments[prefix.segments.len()..].to_vec(),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

// Paths cross the hosting service's API boundary as plain strings, so
// they serialize as their display form and re-validate on the way in.

impl serde::Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Path, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s: String = serde::Deserialize::deserialize(deserializer)?;
        Path::parse(&s).map_err(D::Error::custom)
    }
}
