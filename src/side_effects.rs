//! Traversal-global shared state.
//!
//! One [`SideEffects`] store exists per traversal execution, shared by
//! every traverser of that execution through an `Arc` handle. Mutations are
//! visible to all of them. The store carries its own locking discipline; a
//! traverser only holds the handle and forwards reads and writes.
//!
//! Entries may be *graph-scoped*: bound to the local graph instance and
//! therefore meaningless once a pipeline is rewritten for distributed,
//! vertex-centric execution, where no single globally-consistent store
//! exists. The distributed rewrite calls
//! [`clear_graph_scope`](SideEffects::clear_graph_scope) to drop exactly
//! that state while leaving plain entries alone.

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

use crate::value::TraversalValue;

#[derive(Debug, Default)]
struct Store {
    values: FxHashMap<String, TraversalValue>,
    graph_scoped: FxHashSet<String>,
}

/// Keyed store of traversal-global state.
///
/// # Examples
///
/// ```rust
/// use pathloom::side_effects::SideEffects;
/// use pathloom::value::TraversalValue;
///
/// let store = SideEffects::shared();
/// store.set("count", TraversalValue::Int(3));
/// assert_eq!(store.get("count"), Some(TraversalValue::Int(3)));
/// assert_eq!(store.get("missing"), None);
/// ```
#[derive(Debug, Default)]
pub struct SideEffects {
    inner: RwLock<Store>,
}

impl SideEffects {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store already wrapped in the shared handle that
    /// traversers hold.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Read a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<TraversalValue> {
        self.inner.read().values.get(key).cloned()
    }

    /// Write a value under `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: TraversalValue) {
        self.inner.write().values.insert(key.into(), value);
    }

    /// Write a value under `key` and mark the key graph-scoped.
    ///
    /// Graph-scoped entries are removed wholesale by
    /// [`clear_graph_scope`](Self::clear_graph_scope) when a pipeline is
    /// rewritten for distributed execution.
    pub fn set_graph_scoped(&self, key: impl Into<String>, value: TraversalValue) {
        let key = key.into();
        let mut store = self.inner.write();
        store.graph_scoped.insert(key.clone());
        store.values.insert(key, value);
    }

    /// Returns `true` if `key` is marked graph-scoped.
    #[must_use]
    pub fn is_graph_scoped(&self, key: &str) -> bool {
        self.inner.read().graph_scoped.contains(key)
    }

    /// Remove every graph-scoped entry, returning how many were dropped.
    ///
    /// Plain entries survive.
    pub fn clear_graph_scope(&self) -> usize {
        let mut store = self.inner.write();
        let keys: Vec<String> = store.graph_scoped.drain().collect();
        let mut removed = 0;
        for key in keys {
            if store.values.remove(&key).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Returns `true` if `key` has a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().values.contains_key(key)
    }

    /// All keys, in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().values.keys().cloned().collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().values.len()
    }

    /// Returns `true` if the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().values.is_empty()
    }
}
