//! The privileged administration surface of a traverser.
//!
//! Steps and the execution runtime mutate traversers through [`Admin`];
//! end-user pipeline-construction code never holds one. The surface is
//! deliberately narrow: lifecycle (merge, split), position (set,
//! destination), loop bookkeeping, bulk, and side-effect rebinding.
//!
//! There is no dedicated `halt()` mutator: halting is only ever achieved
//! by setting the destination to [`Destination::Halt`], and
//! [`Traverser::is_halted`] stays read-only.

use std::sync::Arc;

use super::{Traverser, TraverserError};
use crate::side_effects::SideEffects;
use crate::types::Destination;
use crate::value::TraversalValue;

/// Privileged view over a mutably-borrowed traverser.
///
/// Obtained via [`Traverser::admin`]; lives only as long as the borrow.
#[derive(Debug)]
pub struct Admin<'a> {
    traverser: &'a mut Traverser,
}

impl<'a> Admin<'a> {
    pub(super) fn new(traverser: &'a mut Traverser) -> Self {
        Self { traverser }
    }

    /// Fold `other`'s bulk into this traverser.
    ///
    /// Precondition: the two traversers satisfy the merge-equality
    /// invariant (equal value, path, sack, loops, destination). `other` is
    /// consumed and discarded.
    pub fn merge(&mut self, other: Traverser) -> Result<(), TraverserError> {
        if let Some(field) = self.traverser.merge_mismatch(&other) {
            return Err(TraverserError::NotMergeable { field });
        }
        self.traverser.bulk = self.traverser.bulk.saturating_add(other.bulk);
        Ok(())
    }

    /// Generate a child traverser positioned at `value`, with the parent's
    /// path extended by one `(label, value)` entry.
    ///
    /// The child inherits loops, bulk, sack, destination, and the shared
    /// side-effect handle. Used when one step emits multiple derived
    /// traversers from one input.
    #[must_use]
    pub fn split_with(&self, label: impl Into<String>, value: TraversalValue) -> Traverser {
        let parent = &*self.traverser;
        let mut path = parent.path.clone();
        path.push(label, value.clone());
        Traverser {
            value,
            sack: parent.sack.clone(),
            path,
            loops: parent.loops,
            bulk: parent.bulk,
            side_effects: Arc::clone(&parent.side_effects),
            destination: parent.destination.clone(),
        }
    }

    /// Generate a sibling traverser with a full copy of all mutable state.
    ///
    /// The side-effect handle stays shared: side effects are
    /// traversal-global, not per-traverser. Used when a step must branch a
    /// traverser without changing its current value.
    #[must_use]
    pub fn split(&self) -> Traverser {
        self.traverser.clone()
    }

    /// Overwrite the current value in place.
    ///
    /// No path entry is recorded; transformation steps that do not extend
    /// lineage use this.
    pub fn set(&mut self, value: TraversalValue) {
        self.traverser.value = value;
    }

    /// Increment the loop counter.
    ///
    /// The traverser has no awareness of loop topology; the step at the
    /// loop boundary is responsible for calling this.
    pub fn incr_loops(&mut self) {
        self.traverser.loops = self.traverser.loops.saturating_add(1);
    }

    /// Reset the loop counter to zero, on loop exit.
    pub fn reset_loops(&mut self) {
        self.traverser.loops = 0;
    }

    /// Set where the traverser is headed next.
    ///
    /// Setting [`Destination::Halt`] marks the traverser terminal.
    pub fn set_destination(&mut self, destination: Destination) {
        self.traverser.destination = destination;
    }

    /// Overwrite the bulk multiplier.
    ///
    /// Used by aggregating steps. `count` must represent at least one
    /// traverser.
    pub fn set_bulk(&mut self, count: u64) -> Result<(), TraverserError> {
        if count == 0 {
            return Err(TraverserError::ZeroBulk);
        }
        self.traverser.bulk = count;
        Ok(())
    }

    /// Rebind the shared side-effect handle.
    ///
    /// Required when a traverser crosses an execution boundary into a new
    /// side-effect scope.
    pub fn set_side_effects(&mut self, side_effects: Arc<SideEffects>) {
        self.traverser.side_effects = side_effects;
    }
}
