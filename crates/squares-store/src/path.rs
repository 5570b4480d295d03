//! Slash-separated addresses into the store tree.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a subtree, e.g. `settings/winners/q1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// The whole tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `a/b/c`. Leading and trailing slashes are ignored.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let parsed = Self {
            segments: trimmed.split('/').map(str::to_string).collect(),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Append one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Reject empty segments and segments containing a slash.
    pub fn validate(&self) -> Result<()> {
        match self
            .segments
            .iter()
            .find(|s| s.is_empty() || s.contains('/') || s.chars().any(char::is_control))
        {
            Some(_) => Err(StoreError::InvalidPath(self.to_string())),
            None => Ok(()),
        }
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when `self` equals `other` or contains it.
    pub fn contains(&self, other: &StorePath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// True when a write at one path can change the value seen at the other.
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}
