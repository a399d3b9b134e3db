//! The detached, migration-safe form of a traverser.
//!
//! Detaching is an explicit ownership transfer: [`Traverser::detach`]
//! consumes the live instance and produces a [`DetachedTraverser`] holding
//! only self-contained, re-hydratable representations. Attaching is the
//! only legal way back to a live, context-bound traverser, and it requires
//! a specific host entity, never the whole graph.

use serde::{Deserialize, Serialize};

use super::Traverser;
use crate::element::{AttachError, AttachTarget};
use crate::path::Path;
use crate::side_effects::SideEffects;
use crate::types::Destination;
use crate::value::TraversalValue;

/// A traverser with no references to live process-local resources.
///
/// Safe to serialize or move across a process boundary. Carries no
/// side-effect handle: the receiving runtime rebinds one after
/// [`attach`](Self::attach) via
/// [`Admin::set_side_effects`](super::Admin::set_side_effects).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetachedTraverser {
    value: TraversalValue,
    sack: Option<TraversalValue>,
    path: Path,
    loops: u16,
    bulk: u64,
    destination: Destination,
}

impl DetachedTraverser {
    pub(super) fn from_parts(
        value: TraversalValue,
        sack: Option<TraversalValue>,
        path: Path,
        loops: u16,
        bulk: u64,
        destination: Destination,
    ) -> Self {
        debug_assert!(!value.has_live_refs());
        debug_assert!(!path.has_live_refs());
        Self {
            value,
            sack,
            path,
            loops,
            bulk,
            destination,
        }
    }

    /// The detached current value.
    #[must_use]
    pub fn value(&self) -> &TraversalValue {
        &self.value
    }

    /// The detached sack, if one was set.
    #[must_use]
    pub fn sack(&self) -> Option<&TraversalValue> {
        self.sack.as_ref()
    }

    /// The detached path history.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loop counter carried across the boundary.
    #[must_use]
    pub fn loops(&self) -> u16 {
        self.loops
    }

    /// Bulk multiplier carried across the boundary.
    #[must_use]
    pub fn bulk(&self) -> u64 {
        self.bulk
    }

    /// Where the traverser is headed on the receiving side.
    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Regenerate a live traverser at `target`.
    ///
    /// The current value is resolved back into live handles against the
    /// host; path and sack entries stay as snapshots, which compare equal
    /// to their live counterparts by entity id. The traverser starts with
    /// a fresh empty side-effect store; rebinding into the receiving
    /// scope is the runtime's next move.
    ///
    /// Attaching to [`AttachTarget::Graph`] fails: a traverser's position
    /// is always entity-local, never graph-global.
    pub fn attach(self, target: &AttachTarget<'_>) -> Result<Traverser, AttachError> {
        if matches!(target, AttachTarget::Graph) {
            return Err(AttachError::GraphAttach);
        }
        let value = self.value.attach(target)?;
        Ok(Traverser {
            value,
            sack: self.sack,
            path: self.path,
            loops: self.loops,
            bulk: self.bulk,
            side_effects: SideEffects::shared(),
            destination: self.destination,
        })
    }
}
