//! Location keys: canonical path identifiers for the active screen.
//!
//! A [`LocationKey`] is an ordered sequence of segment identifiers joined by
//! [`SEPARATOR`], root first. The empty key is the home screen. A key is
//! meaningful only when each prefix resolves to a menu node at that depth;
//! resolution lives in [`crate::menu::MenuTree::resolve`].
//!
//! # Invariants
//!
//! 1. Segments are never empty strings (strict parsing rejects them,
//!    lossy parsing drops them).
//! 2. Depth never exceeds [`MAX_DEPTH`] (strict parsing rejects, lossy
//!    parsing truncates).
//! 3. `parse(k.to_string()) == k` for every key produced by this module.

use std::fmt;

/// Separator joining key segments in the canonical string form.
pub const SEPARATOR: char = '-';

/// Maximum navigation depth (main panel plus four auxiliary levels).
pub const MAX_DEPTH: usize = 5;

/// Errors from strict [`LocationKey`] parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// A segment between separators was empty.
    EmptySegment {
        /// Zero-based index of the offending segment.
        index: usize,
    },
    /// The key had more than [`MAX_DEPTH`] segments.
    TooDeep {
        /// Number of segments found.
        depth: usize,
    },
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySegment { index } => {
                write!(f, "empty segment at index {index}")
            }
            Self::TooDeep { depth } => {
                write!(f, "key depth {depth} exceeds maximum {MAX_DEPTH}")
            }
        }
    }
}

impl std::error::Error for KeyError {}

/// An ordered path of segment identifiers, root first.
///
/// The empty key identifies the home screen. Keys are cheap to clone and
/// compare; equality is segment-wise (equivalently, canonical-string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationKey {
    segments: Vec<String>,
}

impl LocationKey {
    /// The home key (no segments).
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Build a key from segments, validating each.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for (index, seg) in segments.iter().enumerate() {
            if seg.is_empty() {
                return Err(KeyError::EmptySegment { index });
            }
        }
        if segments.len() > MAX_DEPTH {
            return Err(KeyError::TooDeep {
                depth: segments.len(),
            });
        }
        Ok(Self { segments })
    }

    /// Strict parse of the canonical string form.
    ///
    /// The empty string parses to the home key.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        Self::from_segments(raw.split(SEPARATOR))
    }

    /// Lossy parse: drops empty segments and truncates past [`MAX_DEPTH`].
    ///
    /// Used on untrusted input where a degraded key beats an error; the
    /// synchronizer's soft-fail walk clamps whatever survives to the
    /// deepest existing node anyway.
    #[must_use]
    pub fn parse_lossy(raw: &str) -> Self {
        let segments: Vec<String> = raw
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .take(MAX_DEPTH)
            .map(str::to_owned)
            .collect();
        Self { segments }
    }

    /// Whether this is the home key.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// All segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segment at `index`, if present.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// Final segment, if any.
    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The prefix of the first `depth` segments (clamped to actual depth).
    #[must_use]
    pub fn prefix(&self, depth: usize) -> Self {
        Self {
            segments: self.segments[..depth.min(self.segments.len())].to_vec(),
        }
    }

    /// Parent key (one segment shorter); home for root and depth-1 keys.
    #[must_use]
    pub fn parent(&self) -> Self {
        self.prefix(self.depth().saturating_sub(1))
    }

    /// All non-root prefixes, shallowest first (depth 1 ..= depth).
    pub fn prefixes(&self) -> impl Iterator<Item = Self> + '_ {
        (1..=self.depth()).map(|d| self.prefix(d))
    }

    /// Whether `self` starts with every segment of `other`.
    #[must_use]
    pub fn starts_with(&self, other: &Self) -> bool {
        self.segments.len() >= other.segments.len()
            && self.segments[..other.segments.len()] == other.segments[..]
    }

    /// Append a segment, returning a new key.
    ///
    /// Saturates at [`MAX_DEPTH`]: appending to a full key returns a clone.
    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> Self {
        if self.depth() >= MAX_DEPTH {
            return self.clone();
        }
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for seg in &self.segments {
            if !first {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{seg}")?;
            first = false;
        }
        Ok(())
    }
}
