//! Dotted field paths

use std::fmt;

use serde_json::Value;

use super::errors::{JoinError, JoinResult};

/// A parsed dotted path such as `items.sku`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path. Empty paths and empty segments are rejected.
    pub fn parse(path: &str) -> JoinResult<Self> {
        if path.is_empty() {
            return Err(JoinError::InvalidFieldPath {
                path: path.to_string(),
                reason: "path is empty",
            });
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(JoinError::InvalidFieldPath {
                path: path.to_string(),
                reason: "path has an empty segment",
            });
        }

        Ok(Self { segments })
    }

    /// Splits on the last separator into `(parent, leaf)`. The parent is
    /// None for single-segment paths.
    pub fn split_last(&self) -> (Option<FieldPath>, &str) {
        match self.segments.split_last() {
            Some((leaf, parent)) if !parent.is_empty() => (
                Some(FieldPath {
                    segments: parent.to_vec(),
                }),
                leaf,
            ),
            Some((leaf, _)) => (None, leaf),
            None => (None, ""),
        }
    }

    /// Resolves the path against a document
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |current, segment| current.get(segment))
    }

    /// Replaces the value at this path. Returns false if an intermediate
    /// segment is missing or not a mapping.
    pub fn replace(&self, document: &mut Value, value: Value) -> bool {
        let Some((leaf, parent)) = self.segments.split_last() else {
            return false;
        };

        let mut current = document;
        for segment in parent {
            match current.get_mut(segment) {
                Some(next) => current = next,
                None => return false,
            }
        }

        match current.as_object_mut() {
            Some(object) => {
                object.insert(leaf.clone(), value);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
