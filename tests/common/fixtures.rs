//! In-memory graph fixtures: vertices, edges, and a resolving host.

use pathloom::element::{Edge, EntityId, Host, Vertex};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::Arc;

/// Minimal vertex backed by plain fields.
#[derive(Debug, Clone)]
pub struct TestVertex {
    id: i64,
    label: String,
    props: FxHashMap<String, Value>,
}

impl TestVertex {
    pub fn new(id: i64, label: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
            props: FxHashMap::default(),
        }
    }

    pub fn with_prop(mut self, key: &str, value: Value) -> Self {
        self.props.insert(key.to_string(), value);
        self
    }
}

impl Vertex for TestVertex {
    fn id(&self) -> EntityId {
        EntityId::Int(self.id)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn property(&self, key: &str) -> Option<Value> {
        self.props.get(key).cloned()
    }

    fn properties(&self) -> FxHashMap<String, Value> {
        self.props.clone()
    }
}

/// Minimal edge backed by plain fields.
#[derive(Debug, Clone)]
pub struct TestEdge {
    id: i64,
    label: String,
    out_v: i64,
    in_v: i64,
    props: FxHashMap<String, Value>,
}

impl TestEdge {
    pub fn new(id: i64, label: &str, out_v: i64, in_v: i64) -> Self {
        Self {
            id,
            label: label.to_string(),
            out_v,
            in_v,
            props: FxHashMap::default(),
        }
    }

    pub fn with_prop(mut self, key: &str, value: Value) -> Self {
        self.props.insert(key.to_string(), value);
        self
    }
}

impl Edge for TestEdge {
    fn id(&self) -> EntityId {
        EntityId::Int(self.id)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn out_vertex_id(&self) -> EntityId {
        EntityId::Int(self.out_v)
    }

    fn in_vertex_id(&self) -> EntityId {
        EntityId::Int(self.in_v)
    }

    fn property(&self, key: &str) -> Option<Value> {
        self.props.get(key).cloned()
    }

    fn properties(&self) -> FxHashMap<String, Value> {
        self.props.clone()
    }
}

/// Host resolving entity ids from in-memory registries.
pub struct TestHost {
    id: i64,
    vertices: FxHashMap<EntityId, Arc<dyn Vertex>>,
    edges: FxHashMap<EntityId, Arc<dyn Edge>>,
}

impl TestHost {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            vertices: FxHashMap::default(),
            edges: FxHashMap::default(),
        }
    }

    pub fn add_vertex(&mut self, vertex: TestVertex) -> Arc<dyn Vertex> {
        let handle: Arc<dyn Vertex> = Arc::new(vertex);
        self.vertices.insert(handle.id(), Arc::clone(&handle));
        handle
    }

    pub fn add_edge(&mut self, edge: TestEdge) -> Arc<dyn Edge> {
        let handle: Arc<dyn Edge> = Arc::new(edge);
        self.edges.insert(handle.id(), Arc::clone(&handle));
        handle
    }
}

impl Host for TestHost {
    fn host_id(&self) -> EntityId {
        EntityId::Int(self.id)
    }

    fn vertex(&self, id: &EntityId) -> Option<Arc<dyn Vertex>> {
        self.vertices.get(id).cloned()
    }

    fn edge(&self, id: &EntityId) -> Option<Arc<dyn Edge>> {
        self.edges.get(id).cloned()
    }
}
