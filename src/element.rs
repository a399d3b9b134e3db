//! Graph entity boundary: identities, live capability handles, and
//! detached snapshots.
//!
//! The storage backend is an external collaborator. It exposes vertices and
//! edges to the traversal machine through the object-safe [`Vertex`] and
//! [`Edge`] capability traits, and exposes attach targets through [`Host`].
//! The traversal machine never sees the backend itself.
//!
//! A *detached* entity ([`DetachedVertex`], [`DetachedEdge`]) is a
//! self-contained snapshot with no references into live process-local
//! storage. Detached entities are what cross process boundaries; a live
//! handle is recovered by resolving the snapshot's id against a [`Host`]
//! within the receiving execution context.

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Stable, opaque identity of a graph entity.
///
/// Backends choose whichever id shape they natively use; the traversal
/// machine only requires that ids are hashable, ordered, and printable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityId {
    /// Numeric id, common for embedded storage engines.
    Int(i64),
    /// String id.
    Text(String),
    /// UUID id.
    Uuid(Uuid),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Uuid(u) => write!(f, "{u}"),
        }
    }
}

impl From<i64> for EntityId {
    fn from(i: i64) -> Self {
        EntityId::Int(i)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        EntityId::Uuid(u)
    }
}

/// Live vertex capability supplied by the storage backend.
///
/// Handles are reference-shaped: cloning the `Arc` they travel in does not
/// copy entity data, and equality throughout the traversal machine is by
/// id and label, never by pointer.
pub trait Vertex: fmt::Debug + Send + Sync {
    /// Stable identity of this vertex.
    fn id(&self) -> EntityId;

    /// Label (type name) of this vertex.
    fn label(&self) -> &str;

    /// Read a single property, if present.
    fn property(&self, key: &str) -> Option<Value>;

    /// Snapshot all properties.
    fn properties(&self) -> FxHashMap<String, Value>;
}

/// Live edge capability supplied by the storage backend.
pub trait Edge: fmt::Debug + Send + Sync {
    /// Stable identity of this edge.
    fn id(&self) -> EntityId;

    /// Label (type name) of this edge.
    fn label(&self) -> &str;

    /// Identity of the vertex this edge points out of.
    fn out_vertex_id(&self) -> EntityId;

    /// Identity of the vertex this edge points into.
    fn in_vertex_id(&self) -> EntityId;

    /// Read a single property, if present.
    fn property(&self, key: &str) -> Option<Value>;

    /// Snapshot all properties.
    fn properties(&self) -> FxHashMap<String, Value>;
}

/// Self-contained vertex snapshot, safe to serialize or migrate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetachedVertex {
    /// Identity, resolvable against a [`Host`] on reattachment.
    pub id: EntityId,
    /// Vertex label.
    pub label: String,
    /// Property snapshot at detach time.
    #[serde(default)]
    pub properties: FxHashMap<String, Value>,
}

impl DetachedVertex {
    /// Snapshot a live vertex handle.
    pub fn from_vertex(vertex: &dyn Vertex) -> Self {
        Self {
            id: vertex.id(),
            label: vertex.label().to_string(),
            properties: vertex.properties(),
        }
    }
}

/// Self-contained edge snapshot, safe to serialize or migrate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetachedEdge {
    /// Identity, resolvable against a [`Host`] on reattachment.
    pub id: EntityId,
    /// Edge label.
    pub label: String,
    /// Identity of the out-vertex.
    pub out_vertex: EntityId,
    /// Identity of the in-vertex.
    pub in_vertex: EntityId,
    /// Property snapshot at detach time.
    #[serde(default)]
    pub properties: FxHashMap<String, Value>,
}

impl DetachedEdge {
    /// Snapshot a live edge handle.
    pub fn from_edge(edge: &dyn Edge) -> Self {
        Self {
            id: edge.id(),
            label: edge.label().to_string(),
            out_vertex: edge.out_vertex_id(),
            in_vertex: edge.in_vertex_id(),
            properties: edge.properties(),
        }
    }
}

/// An attach target: the live entity hosting a migrated traverser.
///
/// A host resolves entity ids back into live handles within the current
/// execution context. Under distributed execution each vertex-local
/// pipeline instance supplies its own host.
pub trait Host: Send + Sync {
    /// Identity of the hosting entity itself.
    fn host_id(&self) -> EntityId;

    /// Resolve a vertex id to a live handle, if known to this context.
    fn vertex(&self, id: &EntityId) -> Option<Arc<dyn Vertex>>;

    /// Resolve an edge id to a live handle, if known to this context.
    fn edge(&self, id: &EntityId) -> Option<Arc<dyn Edge>>;
}

/// What a detached traverser or value is being attached to.
///
/// A traverser's position is always entity-local. The [`Graph`](Self::Graph)
/// target exists so that callers holding only a whole-graph capability get a
/// structural error instead of a silently wrong binding.
pub enum AttachTarget<'a> {
    /// A specific host entity within the current execution context.
    Entity(&'a dyn Host),
    /// The whole graph. Always rejected.
    Graph,
}

/// Errors raised while resolving detached state against a live context.
#[derive(Debug, Error, Diagnostic)]
pub enum AttachError {
    /// A traverser can only exist at entities, not at the graph. This is a
    /// permanent structural restriction, not a transient condition.
    #[error("a traverser can only attach to a host entity, not to the graph")]
    #[diagnostic(
        code(pathloom::element::graph_attach),
        help("resolve a specific host entity and attach to that instead")
    )]
    GraphAttach,

    /// The host could not resolve the entity id within this context.
    #[error("entity {id} is not resolvable by host {host}")]
    #[diagnostic(
        code(pathloom::element::unresolved_entity),
        help("the entity may live on a different host; route the traverser there first")
    )]
    UnresolvedEntity {
        /// Id that failed to resolve.
        id: EntityId,
        /// Id of the host that was asked.
        host: EntityId,
    },
}
