//! Step traits consumed by the traversal machine.
//!
//! A step is a pure function from one traverser to zero-or-more
//! traversers. Steps derive children and siblings exclusively through the
//! traverser's administration surface and route their outputs by setting
//! destinations.

use miette::Diagnostic;
use thiserror::Error;

use crate::path::PathError;
use crate::traverser::{Traverser, TraverserError};
use crate::types::ExecutionEngine;
use crate::value::ValueOrderError;

/// A single unit of computation within a pipeline.
///
/// # Design Principles
///
/// - **Label-addressed**: traversers are routed to a step by its label
/// - **Pure over traversers**: a step consumes one traverser and emits
///   zero or more, deriving them via [`Traverser::admin`]
/// - **Engine-agnostic by default**: steps that switch algorithm variants
///   per engine opt in through [`as_engine_aware`](Self::as_engine_aware)
pub trait Step: Send + Sync {
    /// The label traversers are routed to this step by.
    fn label(&self) -> &str;

    /// Process one traverser, producing its successors.
    ///
    /// An empty output filters the traverser out; outputs headed at
    /// [`Destination::Halt`](crate::types::Destination::Halt) are
    /// terminal results.
    fn process(&mut self, traverser: Traverser) -> Result<Vec<Traverser>, StepError>;

    /// The engine-aware view of this step, if it has one.
    ///
    /// Strategies use this to notify a step of the selected engine
    /// without downcasting. The default is `None`: most steps run the
    /// same algorithm under either engine.
    fn as_engine_aware(&mut self) -> Option<&mut dyn EngineAware> {
        None
    }
}

/// Capability of a step that switches internal algorithm variants based on
/// the selected execution engine.
///
/// Notified exactly once per strategy application, in step order. A step
/// may be notified again when strategies are re-applied with the same
/// engine; implementations must treat repeated notification as a no-op
/// rather than accumulating state.
pub trait EngineAware {
    /// Receive the engine the pipeline will execute under.
    fn on_engine(&mut self, engine: ExecutionEngine);
}

/// Fatal errors raised by step execution.
///
/// The traverser and strategy layers surface these unchanged; the
/// executor only wraps them with the failing step's label.
#[derive(Debug, Error, Diagnostic)]
pub enum StepError {
    /// Expected input data is missing from the traverser.
    #[error("missing expected input: {what}")]
    #[diagnostic(
        code(pathloom::step::missing_input),
        help("check that the upstream step produced the required data")
    )]
    MissingInput { what: &'static str },

    /// The step's internal algorithm failed.
    #[error("step failed: {0}")]
    #[diagnostic(code(pathloom::step::failed))]
    Failed(String),

    /// Value comparison inside the step failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Order(#[from] ValueOrderError),

    /// Path lookup inside the step failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    /// Traverser administration inside the step failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Traverser(#[from] TraverserError),
}
