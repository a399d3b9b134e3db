//! Exchange codec: the boundary between traversal values and structured
//! documents.
//!
//! The codec maps graph entities and arbitrary traversal values to JSON
//! documents and back. It is invoked independently of execution, whenever
//! a value must leave the process: result streaming, migration payloads,
//! external tooling.
//!
//! # Configuration
//!
//! Built through [`ExchangeCodec::build`]:
//!
//! - `embed_type_tags`: annotate values with their originating kind under
//!   the reserved [`TYPE_TAG`] field so they reconstruct losslessly
//! - `normalize_key_order`: deterministic, key-ordered compact output for
//!   reproducible comparisons; disabled, documents pretty-print for
//!   readability
//! - `extra_module`: named serializer/deserializer extensions layered on
//!   top of the base mapping
//! - `auto_discover_extensions`: additionally layer every extension
//!   registered process-wide (see [`registry`])
//!
//! Values with no lossless JSON form fall back to their textual
//! representation (non-finite floats, for example), and map keys are
//! always strings on output.
//!
//! # Examples
//!
//! ```rust
//! use pathloom::codec::ExchangeCodec;
//! use pathloom::value::TraversalValue;
//!
//! let codec = ExchangeCodec::build()
//!     .embed_type_tags(true)
//!     .normalize_key_order(true)
//!     .create();
//!
//! let value = TraversalValue::Int(42);
//! let doc = codec.encode(&value).unwrap();
//! assert_eq!(codec.decode(&doc).unwrap(), value);
//! ```

pub mod modules;
pub mod registry;
pub mod writer;

pub use modules::CodecModule;
pub use writer::CodecWriter;

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use thiserror::Error;

use crate::element::{DetachedEdge, DetachedVertex};
use crate::value::TraversalValue;

/// Reserved field carrying a value's originating kind.
///
/// Present only when type embedding is enabled; the leading `@`
/// distinguishes it from ordinary data fields.
pub const TYPE_TAG: &str = "@type";

/// Reserved field carrying a tagged value's payload.
pub const VALUE_TAG: &str = "@value";

/// A configured codec instance.
///
/// Cheap to clone; extension modules are shared.
#[derive(Clone)]
pub struct ExchangeCodec {
    embed_type_tags: bool,
    normalize_key_order: bool,
    modules: Vec<Arc<dyn CodecModule>>,
}

impl ExchangeCodec {
    /// Start building a codec.
    #[must_use]
    pub fn build() -> CodecBuilder {
        CodecBuilder::new()
    }

    /// Returns `true` if documents carry type tags.
    #[must_use]
    pub fn embeds_type_tags(&self) -> bool {
        self.embed_type_tags
    }

    /// Returns `true` if string output is normalized.
    #[must_use]
    pub fn is_normalizing(&self) -> bool {
        self.normalize_key_order
    }

    /// Names of the extension modules layered on this codec, in
    /// consultation order.
    #[must_use]
    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Map a traversal value to a document.
    ///
    /// Extension modules get first crack, in registration order; the base
    /// mapping handles the rest.
    pub fn encode(&self, value: &TraversalValue) -> Result<Value, CodecError> {
        for module in &self.modules {
            if let Some(result) = module.encode(value) {
                return result;
            }
        }
        self.encode_base(value)
    }

    /// Map a document back to a traversal value.
    ///
    /// With type tags embedded, reconstruction is lossless and an unknown
    /// tag is a serialization error. Without tags, mapping is structural:
    /// numbers become ints where exact, objects become maps.
    pub fn decode(&self, doc: &Value) -> Result<TraversalValue, CodecError> {
        if let Some(obj) = doc.as_object() {
            if let Some(tag) = obj.get(TYPE_TAG).and_then(Value::as_str) {
                let null = Value::Null;
                let payload = obj.get(VALUE_TAG).unwrap_or(&null);
                for module in &self.modules {
                    if let Some(result) = module.decode(tag, payload) {
                        return result;
                    }
                }
                return self.decode_tagged(tag, payload);
            }
        }
        self.decode_structural(doc)
    }

    /// Encode straight to a string.
    ///
    /// Normalized codecs produce compact, key-ordered documents that are
    /// byte-identical for logically-equal values; otherwise output is
    /// pretty-printed.
    pub fn encode_to_string(&self, value: &TraversalValue) -> Result<String, CodecError> {
        let doc = self.encode(value)?;
        let rendered = if self.normalize_key_order {
            serde_json::to_string(&doc)?
        } else {
            serde_json::to_string_pretty(&doc)?
        };
        Ok(rendered)
    }

    /// Decode from a string document.
    pub fn decode_str(&self, raw: &str) -> Result<TraversalValue, CodecError> {
        let doc: Value = serde_json::from_str(raw)?;
        self.decode(&doc)
    }

    fn encode_base(&self, value: &TraversalValue) -> Result<Value, CodecError> {
        let doc = match value {
            TraversalValue::Null => Value::Null,
            TraversalValue::Bool(b) => Value::Bool(*b),
            TraversalValue::Text(s) => Value::String(s.clone()),
            TraversalValue::Int(i) => self.tagged("int", json!(i)),
            TraversalValue::Float(x) => {
                // serde_json has no representation for non-finite floats;
                // they fall back to their textual form.
                let payload = if x.is_finite() {
                    json!(x)
                } else {
                    Value::String(x.to_string())
                };
                self.tagged("float", payload)
            }
            TraversalValue::Timestamp(t) => self.tagged("timestamp", json!(t.to_rfc3339())),
            TraversalValue::List(items) => {
                let mut encoded = Vec::with_capacity(items.len());
                for item in items {
                    encoded.push(self.encode(item)?);
                }
                Value::Array(encoded)
            }
            TraversalValue::Map(entries) => {
                let mut encoded = Map::new();
                for (key, item) in entries {
                    encoded.insert(key.clone(), self.encode(item)?);
                }
                Value::Object(encoded)
            }
            TraversalValue::Vertex(v) => {
                let snapshot = DetachedVertex::from_vertex(v.as_ref());
                self.tagged("vertex", serde_json::to_value(&snapshot)?)
            }
            TraversalValue::DetachedVertex(v) => {
                self.tagged("vertex", serde_json::to_value(v)?)
            }
            TraversalValue::Edge(e) => {
                let snapshot = DetachedEdge::from_edge(e.as_ref());
                self.tagged("edge", serde_json::to_value(&snapshot)?)
            }
            TraversalValue::DetachedEdge(e) => self.tagged("edge", serde_json::to_value(e)?),
        };
        Ok(doc)
    }

    fn tagged(&self, tag: &str, payload: Value) -> Value {
        if self.embed_type_tags {
            let mut obj = Map::new();
            obj.insert(TYPE_TAG.to_string(), Value::String(tag.to_string()));
            obj.insert(VALUE_TAG.to_string(), payload);
            Value::Object(obj)
        } else {
            payload
        }
    }

    fn decode_tagged(&self, tag: &str, payload: &Value) -> Result<TraversalValue, CodecError> {
        match tag {
            "int" => payload
                .as_i64()
                .map(TraversalValue::Int)
                .ok_or_else(|| CodecError::malformed("int payload is not an integer")),
            "float" => match payload {
                Value::Number(n) => n
                    .as_f64()
                    .map(TraversalValue::Float)
                    .ok_or_else(|| CodecError::malformed("float payload out of range")),
                Value::String(s) => s
                    .parse::<f64>()
                    .map(TraversalValue::Float)
                    .map_err(|_| CodecError::malformed("float payload is not parseable")),
                _ => Err(CodecError::malformed("float payload has no numeric form")),
            },
            "timestamp" => {
                let raw = payload
                    .as_str()
                    .ok_or_else(|| CodecError::malformed("timestamp payload is not a string"))?;
                let parsed = chrono::DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| CodecError::malformed("timestamp payload is not RFC 3339"))?;
                Ok(TraversalValue::Timestamp(parsed.with_timezone(&chrono::Utc)))
            }
            "vertex" => {
                let snapshot: DetachedVertex = serde_json::from_value(payload.clone())?;
                Ok(TraversalValue::DetachedVertex(snapshot))
            }
            "edge" => {
                let snapshot: DetachedEdge = serde_json::from_value(payload.clone())?;
                Ok(TraversalValue::DetachedEdge(snapshot))
            }
            other => Err(CodecError::UnknownTypeTag {
                tag: other.to_string(),
            }),
        }
    }

    fn decode_structural(&self, doc: &Value) -> Result<TraversalValue, CodecError> {
        let value = match doc {
            Value::Null => TraversalValue::Null,
            Value::Bool(b) => TraversalValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    TraversalValue::Int(i)
                } else if let Some(x) = n.as_f64() {
                    TraversalValue::Float(x)
                } else {
                    return Err(CodecError::malformed("number out of representable range"));
                }
            }
            Value::String(s) => TraversalValue::Text(s.clone()),
            Value::Array(items) => {
                let mut decoded = Vec::with_capacity(items.len());
                for item in items {
                    decoded.push(self.decode(item)?);
                }
                TraversalValue::List(decoded)
            }
            Value::Object(obj) => {
                let mut decoded = FxHashMap::default();
                for (key, item) in obj {
                    decoded.insert(key.clone(), self.decode(item)?);
                }
                TraversalValue::Map(decoded)
            }
        };
        Ok(value)
    }
}

impl std::fmt::Debug for ExchangeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeCodec")
            .field("embed_type_tags", &self.embed_type_tags)
            .field("normalize_key_order", &self.normalize_key_order)
            .field("modules", &self.module_names())
            .finish()
    }
}

/// Builder for [`ExchangeCodec`].
#[derive(Default)]
pub struct CodecBuilder {
    embed_type_tags: bool,
    normalize_key_order: bool,
    modules: Vec<Arc<dyn CodecModule>>,
    auto_discover_extensions: bool,
}

impl CodecBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Embed originating kinds into documents so they reconstruct
    /// losslessly.
    #[must_use]
    pub fn embed_type_tags(mut self, embed: bool) -> Self {
        self.embed_type_tags = embed;
        self
    }

    /// Force deterministic, key-ordered compact string output.
    #[must_use]
    pub fn normalize_key_order(mut self, normalize: bool) -> Self {
        self.normalize_key_order = normalize;
        self
    }

    /// Layer a named extension module on top of the base mapping.
    ///
    /// Modules are consulted in registration order, before the base
    /// mapping.
    #[must_use]
    pub fn extra_module(mut self, module: Arc<dyn CodecModule>) -> Self {
        self.modules.push(module);
        self
    }

    /// Additionally layer every extension registered process-wide.
    ///
    /// Discovered extensions are consulted after the ones supplied via
    /// [`extra_module`](Self::extra_module).
    #[must_use]
    pub fn auto_discover_extensions(mut self, auto: bool) -> Self {
        self.auto_discover_extensions = auto;
        self
    }

    /// Finish the codec.
    #[must_use]
    pub fn create(mut self) -> ExchangeCodec {
        if self.auto_discover_extensions {
            self.modules.extend(registry::registered_extensions());
        }
        ExchangeCodec {
            embed_type_tags: self.embed_type_tags,
            normalize_key_order: self.normalize_key_order,
            modules: self.modules,
        }
    }
}

/// Errors raised at the codec boundary.
#[derive(Debug, Error, Diagnostic)]
pub enum CodecError {
    /// A value had no registered mapping and no usable textual fallback.
    #[error("value of kind {kind} has no registered mapping")]
    #[diagnostic(
        code(pathloom::codec::unmapped),
        help("register a codec module that handles this kind")
    )]
    Unmapped {
        /// Kind of the offending value.
        kind: &'static str,
    },

    /// A tagged document named a kind nothing recognizes.
    #[error("unrecognized type tag: {tag}")]
    #[diagnostic(
        code(pathloom::codec::unknown_type_tag),
        help("the document was produced by a codec with an extension module this codec lacks")
    )]
    UnknownTypeTag {
        /// The unrecognized tag.
        tag: String,
    },

    /// A document did not have the shape its tag promised.
    #[error("malformed document: {reason}")]
    #[diagnostic(code(pathloom::codec::malformed))]
    Malformed {
        /// What was wrong.
        reason: String,
    },

    /// Underlying JSON serialization failure.
    #[error(transparent)]
    #[diagnostic(code(pathloom::codec::json))]
    Json(#[from] serde_json::Error),

    /// Underlying sink failure while streaming.
    #[error(transparent)]
    #[diagnostic(code(pathloom::codec::io))]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CodecError::Malformed {
            reason: reason.into(),
        }
    }
}
