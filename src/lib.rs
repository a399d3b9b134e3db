//! # Pathloom: Graph Traversal Execution Core
//!
//! Pathloom is the execution heart of a graph query engine: the traverser
//! abstraction that flows through a pipeline of query steps, the
//! strategy hook that rewrites a pipeline for its execution engine, and
//! the exchange codec that carries graph entities across the process
//! boundary.
//!
//! ## Core Concepts
//!
//! - **Traversers**: Units of execution state carrying a value, path
//!   history, sack, loop counter, and bulk multiplier
//! - **Administration**: The privileged surface steps and the runtime use
//!   to split, merge, reposition, and migrate traversers
//! - **Steps**: Pure functions from one traverser to zero-or-more
//!   traversers, addressed by label
//! - **Strategies**: Rewrite passes applied to a pipeline before
//!   execution, conditionally on the selected engine
//! - **Exchange codec**: Pluggable mapping between traversal values and
//!   structured documents, with optional type embedding and normalized
//!   output
//!
//! ## Quick Start
//!
//! ### Flowing a traverser by hand
//!
//! ```
//! use pathloom::side_effects::SideEffects;
//! use pathloom::traverser::Traverser;
//! use pathloom::types::Destination;
//! use pathloom::value::TraversalValue;
//!
//! let mut t = Traverser::new(
//!     TraversalValue::Int(5),
//!     Destination::step("double"),
//!     SideEffects::shared(),
//! );
//!
//! // Steps mutate traversers through the administration surface.
//! t.admin().set(TraversalValue::Int(10));
//! t.admin().set_destination(Destination::Halt);
//!
//! assert!(t.is_halted());
//! assert_eq!(t.value(), &TraversalValue::Int(10));
//! assert_eq!(t.bulk(), 1);
//! ```
//!
//! ### Building and running a pipeline
//!
//! ```
//! use pathloom::executor::LocalExecutor;
//! use pathloom::pipeline::{PipelineBuilder, Step, StepError};
//! use pathloom::traverser::Traverser;
//! use pathloom::types::{Destination, ExecutionEngine};
//! use pathloom::value::TraversalValue;
//!
//! struct Double {
//!     label: String,
//! }
//!
//! impl Step for Double {
//!     fn label(&self) -> &str {
//!         &self.label
//!     }
//!
//!     fn process(&mut self, mut t: Traverser) -> Result<Vec<Traverser>, StepError> {
//!         let doubled = match t.value() {
//!             TraversalValue::Int(i) => TraversalValue::Int(i * 2),
//!             other => other.clone(),
//!         };
//!         t.admin().set(doubled);
//!         t.admin().set_destination(Destination::Halt);
//!         Ok(vec![t])
//!     }
//! }
//!
//! let mut pipeline = PipelineBuilder::new()
//!     .add_step(Double { label: "double".into() })
//!     .compile(ExecutionEngine::Local)
//!     .unwrap();
//!
//! let results = LocalExecutor::new()
//!     .run(&mut pipeline, vec![TraversalValue::Int(21)])
//!     .unwrap();
//! assert_eq!(results[0].value(), &TraversalValue::Int(42));
//! ```
//!
//! ### Crossing a process boundary
//!
//! A traverser positioned at a live entity is detached into a
//! self-contained snapshot, serialized, and reattached against a host on
//! the receiving side, the only legal way to move one between execution
//! contexts. See [`traverser::DetachedTraverser`].
//!
//! ## Module Guide
//!
//! - [`traverser`] - Traverser, administration surface, and detached form
//! - [`pipeline`] - Steps, pipeline builder, and traversal strategies
//! - [`executor`] - Sequential reference runtime for the local engine
//! - [`codec`] - Exchange codec, extension modules, and streaming writer
//! - [`value`] - The tagged value model traversers carry
//! - [`path`] - Append-only lineage history
//! - [`side_effects`] - Traversal-global shared state
//! - [`element`] - Entity identities, capability traits, and snapshots
//! - [`types`] - Destinations and the execution-engine selector
//! - [`telemetry`] - Tracing bootstrap helpers

pub mod codec;
pub mod element;
pub mod executor;
pub mod path;
pub mod pipeline;
pub mod side_effects;
pub mod telemetry;
pub mod traverser;
pub mod types;
pub mod value;
