//! The traverser: the unit of execution state flowing through a pipeline.
//!
//! A traverser carries the current object, a traverser-local sack, the
//! path history, a loop counter, a bulk multiplier, and a handle to the
//! traversal-global side-effect store. Steps derive children and siblings
//! from it, and the runtime routes it by its destination until that
//! destination is the halt sentinel.
//!
//! # Two surfaces
//!
//! The public surface on [`Traverser`] is read-mostly (plus sack writes,
//! which the original contract leaves public). Everything that changes a
//! traverser's position, lineage, or lifecycle lives on the narrower
//! privileged [`Admin`] surface, obtained via [`Traverser::admin`], so
//! ordinary pipeline-construction code cannot accidentally mutate
//! traverser internals.
//!
//! # Bulking
//!
//! Traversers whose value, path, sack, loop count, and destination are all
//! equal are logically interchangeable. Instead of enumerating them, one
//! instance represents the whole group and its `bulk` counts the members;
//! [`Admin::merge`] folds one traverser into another by summing bulk.
//!
//! # Examples
//!
//! ```rust
//! use pathloom::side_effects::SideEffects;
//! use pathloom::traverser::Traverser;
//! use pathloom::types::Destination;
//! use pathloom::value::TraversalValue;
//!
//! let mut t = Traverser::new(
//!     TraversalValue::Int(5),
//!     Destination::step("a"),
//!     SideEffects::shared(),
//! );
//! t.admin().incr_loops();
//! t.admin().incr_loops();
//! assert_eq!(t.loops(), 2);
//!
//! let mut child = t.admin().split_with("a", TraversalValue::Int(10));
//! assert_eq!(child.value(), &TraversalValue::Int(10));
//! assert_eq!(child.path().len(), 1);
//!
//! child.admin().set_destination(Destination::Halt);
//! assert!(child.is_halted());
//! ```

pub mod admin;
pub mod detached;

pub use admin::Admin;
pub use detached::DetachedTraverser;

use miette::Diagnostic;
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

use crate::path::{Path, PathError};
use crate::side_effects::SideEffects;
use crate::types::Destination;
use crate::value::{TraversalValue, ValueOrderError};

/// The current state of an object flowing through a pipeline.
///
/// Owned by at most one execution context at a time; crossing a context
/// boundary requires an explicit [`detach`](Self::detach) (relinquish)
/// followed by [`DetachedTraverser::attach`] (acquire) on the receiving
/// side.
#[derive(Clone, Debug)]
pub struct Traverser {
    value: TraversalValue,
    sack: Option<TraversalValue>,
    path: Path,
    loops: u16,
    bulk: u64,
    side_effects: Arc<SideEffects>,
    destination: Destination,
}

impl Traverser {
    /// Creates a traverser in its start state: empty path, zero loops,
    /// bulk one, headed at `destination`.
    pub fn new(
        value: TraversalValue,
        destination: Destination,
        side_effects: Arc<SideEffects>,
    ) -> Self {
        Self {
            value,
            sack: None,
            path: Path::new(),
            loops: 0,
            bulk: 1,
            side_effects,
            destination,
        }
    }

    /// Creates a builder for traversers that need a seeded sack or path.
    pub fn builder(value: TraversalValue) -> TraverserBuilder {
        TraverserBuilder::new(value)
    }

    /// The object the traverser is currently at.
    #[must_use]
    pub fn value(&self) -> &TraversalValue {
        &self.value
    }

    /// The traverser-local sack, if one has been set.
    #[must_use]
    pub fn sack(&self) -> Option<&TraversalValue> {
        self.sack.as_ref()
    }

    /// Replace the sack in place ("sack the value").
    pub fn set_sack(&mut self, value: TraversalValue) {
        self.sack = Some(value);
    }

    /// The recorded path history.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The value recorded in the path under `label`.
    ///
    /// Several matches collapse into a list view; a label never recorded
    /// is an error.
    pub fn path_value(&self, label: &str) -> Result<TraversalValue, PathError> {
        self.path.get(label)
    }

    /// Number of times the traverser has gone through the current looping
    /// section.
    #[must_use]
    pub fn loops(&self) -> u16 {
        self.loops
    }

    /// Number of logically-identical traversers this instance represents.
    #[must_use]
    pub fn bulk(&self) -> u64 {
        self.bulk
    }

    /// The traversal-global side-effect store.
    #[must_use]
    pub fn side_effects(&self) -> &Arc<SideEffects> {
        &self.side_effects
    }

    /// Read one value from the side-effect store.
    #[must_use]
    pub fn side_effect(&self, key: &str) -> Option<TraversalValue> {
        self.side_effects.get(key)
    }

    /// Where this traverser is headed next.
    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Returns `true` once the destination is the halt sentinel.
    ///
    /// A halted traverser has successfully passed through the pipeline; it
    /// may still be read but is never advanced again.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.destination.is_halt()
    }

    /// Compare by the natural order of the current values.
    ///
    /// Fails with a type-mismatch error naming the offending kind when the
    /// values are not mutually orderable; never falls back to an arbitrary
    /// order.
    pub fn try_cmp(&self, other: &Traverser) -> Result<Ordering, ValueOrderError> {
        self.value.try_cmp(&other.value)
    }

    /// Returns `true` if `other` can be merged into this traverser:
    /// value, path, sack, loops, and destination are pairwise equal.
    #[must_use]
    pub fn can_merge(&self, other: &Traverser) -> bool {
        self.merge_mismatch(other).is_none()
    }

    /// Access the privileged administration surface.
    ///
    /// Reserved for steps and the execution runtime.
    pub fn admin(&mut self) -> Admin<'_> {
        Admin::new(self)
    }

    /// Prepare the traverser for migration across a process boundary.
    ///
    /// Consumes the live traverser: a live and a detached twin of the same
    /// logical identity never coexist. The result carries value, sack,
    /// path, loops, bulk, and destination with every live entity handle
    /// replaced by a self-contained snapshot; the side-effect handle is
    /// dropped and must be rebound after reattachment.
    #[must_use]
    pub fn detach(self) -> DetachedTraverser {
        DetachedTraverser::from_parts(
            self.value.detach(),
            self.sack.map(TraversalValue::detach),
            self.path.detach(),
            self.loops,
            self.bulk,
            self.destination,
        )
    }

    /// The first field on which `self` and `other` disagree for merging
    /// purposes, or `None` when they are mergeable.
    fn merge_mismatch(&self, other: &Traverser) -> Option<&'static str> {
        if self.value != other.value {
            Some("value")
        } else if self.path != other.path {
            Some("path")
        } else if self.sack != other.sack {
            Some("sack")
        } else if self.loops != other.loops {
            Some("loops")
        } else if self.destination != other.destination {
            Some("destination")
        } else {
            None
        }
    }
}

/// Builder for traversers that need more than the start state.
///
/// # Examples
///
/// ```rust
/// use pathloom::side_effects::SideEffects;
/// use pathloom::traverser::Traverser;
/// use pathloom::types::Destination;
/// use pathloom::value::TraversalValue;
///
/// let t = Traverser::builder(TraversalValue::Int(1))
///     .destination(Destination::step("b"))
///     .sack(TraversalValue::Float(0.5))
///     .side_effects(SideEffects::shared())
///     .build();
/// assert_eq!(t.sack(), Some(&TraversalValue::Float(0.5)));
/// ```
#[derive(Debug)]
pub struct TraverserBuilder {
    value: TraversalValue,
    sack: Option<TraversalValue>,
    path: Path,
    destination: Destination,
    side_effects: Option<Arc<SideEffects>>,
}

impl TraverserBuilder {
    fn new(value: TraversalValue) -> Self {
        Self {
            value,
            sack: None,
            path: Path::new(),
            destination: Destination::Halt,
            side_effects: None,
        }
    }

    /// Seed the traverser-local sack.
    #[must_use]
    pub fn sack(mut self, sack: TraversalValue) -> Self {
        self.sack = Some(sack);
        self
    }

    /// Seed the path history.
    #[must_use]
    pub fn path(mut self, path: Path) -> Self {
        self.path = path;
        self
    }

    /// Set the destination. Defaults to [`Destination::Halt`].
    #[must_use]
    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Bind the traversal-global side-effect store. Defaults to a fresh
    /// empty store.
    #[must_use]
    pub fn side_effects(mut self, side_effects: Arc<SideEffects>) -> Self {
        self.side_effects = Some(side_effects);
        self
    }

    /// Build the traverser with loops zero and bulk one.
    #[must_use]
    pub fn build(self) -> Traverser {
        Traverser {
            value: self.value,
            sack: self.sack,
            path: self.path,
            loops: 0,
            bulk: 1,
            side_effects: self.side_effects.unwrap_or_else(SideEffects::shared),
            destination: self.destination,
        }
    }
}

/// Errors raised by the traverser administration surface.
#[derive(Debug, Error, Diagnostic)]
pub enum TraverserError {
    /// Merge precondition violated: the named field differs between the
    /// two traversers.
    #[error("traversers are not mergeable: {field} differs")]
    #[diagnostic(
        code(pathloom::traverser::not_mergeable),
        help("only traversers with equal value, path, sack, loops, and destination merge")
    )]
    NotMergeable {
        /// First field found to differ.
        field: &'static str,
    },

    /// A bulk multiplier must represent at least one traverser.
    #[error("bulk must be at least 1")]
    #[diagnostic(code(pathloom::traverser::zero_bulk))]
    ZeroBulk,
}
