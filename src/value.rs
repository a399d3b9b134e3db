//! The tagged value a traverser carries through a pipeline.
//!
//! Steps position traversers at graph entities and at plain data alike, so
//! the value model is a closed tagged union rather than a generic
//! parameter: merging, path lineage, and migration all need to compare and
//! snapshot values without knowing their concrete type at compile time.
//!
//! Live entity handles ([`Vertex`](crate::element::Vertex) /
//! [`Edge`](crate::element::Edge) behind an `Arc`) are process-local and
//! refuse serialization; [`TraversalValue::detach`] converts them into
//! self-contained snapshots first. Entity equality is by id and label,
//! live or detached alike, so a detach/attach round-trip is observably
//! neutral.
//!
//! # Examples
//!
//! ```rust
//! use pathloom::value::TraversalValue;
//! use std::cmp::Ordering;
//!
//! let five = TraversalValue::Int(5);
//! let nine = TraversalValue::Int(9);
//! assert_eq!(five.try_cmp(&nine).unwrap(), Ordering::Less);
//!
//! // Unorderable kinds fail loudly instead of falling back to an
//! // arbitrary order.
//! let list = TraversalValue::List(vec![five.clone()]);
//! assert!(five.try_cmp(&list).is_err());
//! ```

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::element::{
    AttachError, AttachTarget, DetachedEdge, DetachedVertex, Edge, Vertex,
};

/// The current object of a traverser.
///
/// Scalar kinds, collections, and graph entities in both live and detached
/// form. The live variants are `#[serde(skip)]`: a value holding one must
/// be detached before it can cross a serialization boundary.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalValue {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Instant in time.
    Timestamp(DateTime<Utc>),
    /// Ordered collection.
    List(Vec<TraversalValue>),
    /// String-keyed collection.
    Map(FxHashMap<String, TraversalValue>),
    /// Detached vertex snapshot.
    DetachedVertex(DetachedVertex),
    /// Detached edge snapshot.
    DetachedEdge(DetachedEdge),
    /// Live vertex handle. Process-local; never serialized.
    #[serde(skip)]
    Vertex(Arc<dyn Vertex>),
    /// Live edge handle. Process-local; never serialized.
    #[serde(skip)]
    Edge(Arc<dyn Edge>),
}

impl TraversalValue {
    /// Short kind name used in diagnostics and type tags.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Vertex(_) | Self::DetachedVertex(_) => "vertex",
            Self::Edge(_) | Self::DetachedEdge(_) => "edge",
        }
    }

    /// Returns `true` if this value holds a live process-local handle,
    /// directly or inside a collection.
    #[must_use]
    pub fn has_live_refs(&self) -> bool {
        match self {
            Self::Vertex(_) | Self::Edge(_) => true,
            Self::List(items) => items.iter().any(TraversalValue::has_live_refs),
            Self::Map(entries) => entries.values().any(TraversalValue::has_live_refs),
            _ => false,
        }
    }

    /// Compare by the natural order of the value.
    ///
    /// Only values of the same orderable kind compare; everything else is
    /// a type-mismatch error naming the offending kind. There is no
    /// fallback ordering.
    pub fn try_cmp(&self, other: &TraversalValue) -> Result<Ordering, ValueOrderError> {
        use TraversalValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => Ok(a.cmp(b)),
            (Int(a), Int(b)) => Ok(a.cmp(b)),
            (Float(a), Float(b)) => {
                a.partial_cmp(b)
                    .ok_or(ValueOrderError::Unorderable { kind: "float" })
            }
            (Text(a), Text(b)) => Ok(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Ok(a.cmp(b)),
            (lhs, rhs) if lhs.kind() == rhs.kind() => Err(ValueOrderError::Unorderable {
                kind: lhs.kind(),
            }),
            (lhs, rhs) => Err(ValueOrderError::TypeMismatch {
                lhs: lhs.kind(),
                rhs: rhs.kind(),
            }),
        }
    }

    /// Replace every live entity handle with a self-contained snapshot,
    /// recursing through collections.
    ///
    /// The result holds no references into process-local storage and is
    /// safe to serialize or migrate.
    #[must_use]
    pub fn detach(self) -> TraversalValue {
        match self {
            Self::Vertex(v) => Self::DetachedVertex(DetachedVertex::from_vertex(v.as_ref())),
            Self::Edge(e) => Self::DetachedEdge(DetachedEdge::from_edge(e.as_ref())),
            Self::List(items) => {
                Self::List(items.into_iter().map(TraversalValue::detach).collect())
            }
            Self::Map(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.detach()))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Resolve detached entity snapshots back into live handles against a
    /// host, recursing through collections.
    ///
    /// Attaching to the whole graph is invalid: a traverser's position is
    /// always entity-local.
    pub fn attach(self, target: &AttachTarget<'_>) -> Result<TraversalValue, AttachError> {
        let host = match target {
            AttachTarget::Entity(host) => *host,
            AttachTarget::Graph => return Err(AttachError::GraphAttach),
        };
        match self {
            Self::DetachedVertex(v) => match host.vertex(&v.id) {
                Some(live) => Ok(Self::Vertex(live)),
                None => Err(AttachError::UnresolvedEntity {
                    id: v.id,
                    host: host.host_id(),
                }),
            },
            Self::DetachedEdge(e) => match host.edge(&e.id) {
                Some(live) => Ok(Self::Edge(live)),
                None => Err(AttachError::UnresolvedEntity {
                    id: e.id,
                    host: host.host_id(),
                }),
            },
            Self::List(items) => {
                let mut attached = Vec::with_capacity(items.len());
                for item in items {
                    attached.push(item.attach(target)?);
                }
                Ok(Self::List(attached))
            }
            Self::Map(entries) => {
                let mut attached = FxHashMap::default();
                for (k, v) in entries {
                    attached.insert(k, v.attach(target)?);
                }
                Ok(Self::Map(attached))
            }
            other => Ok(other),
        }
    }
}

/// Entities are equal by id and label, live or detached alike; everything
/// else is structural.
impl PartialEq for TraversalValue {
    fn eq(&self, other: &Self) -> bool {
        use TraversalValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Vertex(a), Vertex(b)) => a.id() == b.id() && a.label() == b.label(),
            (Vertex(a), DetachedVertex(b)) | (DetachedVertex(b), Vertex(a)) => {
                a.id() == b.id && a.label() == b.label
            }
            (DetachedVertex(a), DetachedVertex(b)) => a.id == b.id && a.label == b.label,
            (Edge(a), Edge(b)) => a.id() == b.id() && a.label() == b.label(),
            (Edge(a), DetachedEdge(b)) | (DetachedEdge(b), Edge(a)) => {
                a.id() == b.id && a.label() == b.label
            }
            (DetachedEdge(a), DetachedEdge(b)) => a.id == b.id && a.label == b.label,
            _ => false,
        }
    }
}

impl fmt::Display for TraversalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => write!(f, "{{{} entries}}", entries.len()),
            Self::Vertex(v) => write!(f, "v[{}]", v.id()),
            Self::DetachedVertex(v) => write!(f, "v[{}]", v.id),
            Self::Edge(e) => write!(f, "e[{}]", e.id()),
            Self::DetachedEdge(e) => write!(f, "e[{}]", e.id),
        }
    }
}

impl From<i64> for TraversalValue {
    fn from(i: i64) -> Self {
        TraversalValue::Int(i)
    }
}

impl From<f64> for TraversalValue {
    fn from(x: f64) -> Self {
        TraversalValue::Float(x)
    }
}

impl From<bool> for TraversalValue {
    fn from(b: bool) -> Self {
        TraversalValue::Bool(b)
    }
}

impl From<&str> for TraversalValue {
    fn from(s: &str) -> Self {
        TraversalValue::Text(s.to_string())
    }
}

impl From<String> for TraversalValue {
    fn from(s: String) -> Self {
        TraversalValue::Text(s)
    }
}

impl From<Vec<TraversalValue>> for TraversalValue {
    fn from(items: Vec<TraversalValue>) -> Self {
        TraversalValue::List(items)
    }
}

/// Errors from [`TraversalValue::try_cmp`].
#[derive(Debug, Error, Diagnostic)]
pub enum ValueOrderError {
    /// The two values have different kinds.
    #[error("cannot order {lhs} against {rhs}")]
    #[diagnostic(code(pathloom::value::order_type_mismatch))]
    TypeMismatch {
        /// Kind of the left operand.
        lhs: &'static str,
        /// Kind of the right operand.
        rhs: &'static str,
    },

    /// The value kind has no natural order.
    #[error("values of kind {kind} have no natural order")]
    #[diagnostic(
        code(pathloom::value::unorderable),
        help("only bool, int, float, text, and timestamp values are orderable")
    )]
    Unorderable {
        /// The offending kind.
        kind: &'static str,
    },
}
