//! Append-only lineage history of a traverser.
//!
//! A [`Path`] records the `(step-label, value)` entries a traverser
//! accumulated while flowing forward through a pipeline. It is append-only
//! during forward flow; steps extend it through the traverser's
//! administration surface, never in place.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::TraversalValue;

/// Ordered sequence of `(label, value)` entries.
///
/// Labels are not unique: a traverser that re-enters a labeled section
/// records a new entry under the same label, and [`get`](Self::get)
/// collapses multiple matches into a list view in recording order.
///
/// # Examples
///
/// ```rust
/// use pathloom::path::Path;
/// use pathloom::value::TraversalValue;
///
/// let mut path = Path::new();
/// path.push("a", TraversalValue::Int(1));
/// path.push("b", TraversalValue::Int(2));
/// path.push("a", TraversalValue::Int(3));
///
/// assert_eq!(path.get("b").unwrap(), TraversalValue::Int(2));
/// assert_eq!(
///     path.get("a").unwrap(),
///     TraversalValue::List(vec![TraversalValue::Int(1), TraversalValue::Int(3)])
/// );
/// assert!(path.get("missing").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    entries: Vec<(String, TraversalValue)>,
}

impl Path {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `(label, value)` entry.
    pub fn push(&mut self, label: impl Into<String>, value: TraversalValue) {
        self.entries.push((label.into(), value));
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value recorded under `label`.
    ///
    /// Exactly one match returns the value itself; several matches return
    /// a [`TraversalValue::List`] in recording order. A label that was
    /// never recorded is an error, distinguishing "never set" from "set to
    /// an empty value".
    pub fn get(&self, label: &str) -> Result<TraversalValue, PathError> {
        let mut matches: Vec<&TraversalValue> = self
            .entries
            .iter()
            .filter(|(l, _)| l == label)
            .map(|(_, v)| v)
            .collect();
        match matches.len() {
            0 => Err(PathError::LabelNotFound {
                label: label.to_string(),
            }),
            1 => Ok(matches.remove(0).clone()),
            _ => Ok(TraversalValue::List(
                matches.into_iter().cloned().collect(),
            )),
        }
    }

    /// Returns `true` if `label` was recorded at least once.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    /// Labels in recording order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(l, _)| l.as_str()).collect()
    }

    /// Values in recording order.
    #[must_use]
    pub fn objects(&self) -> Vec<&TraversalValue> {
        self.entries.iter().map(|(_, v)| v).collect()
    }

    /// Iterate over `(label, value)` entries in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TraversalValue)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }

    /// Detach every recorded value, leaving no live references.
    #[must_use]
    pub fn detach(self) -> Path {
        Path {
            entries: self
                .entries
                .into_iter()
                .map(|(l, v)| (l, v.detach()))
                .collect(),
        }
    }

    /// Returns `true` if any recorded value holds a live handle.
    #[must_use]
    pub fn has_live_refs(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.has_live_refs())
    }
}

/// Errors raised by path lookups.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    /// The label was never recorded on this path.
    #[error("path has no entry labeled {label}")]
    #[diagnostic(
        code(pathloom::path::label_not_found),
        help("only labels recorded by an upstream step can be read back")
    )]
    LabelNotFound {
        /// The label that was asked for.
        label: String,
    },
}
