//! Core types for the pathloom traversal machine.
//!
//! This module defines the fundamental types used throughout the system
//! for routing traversers between pipeline steps and for selecting how a
//! pipeline executes. These are the core domain concepts that define what
//! a traversal *is* from the runtime's point of view.
//!
//! # Key Types
//!
//! - [`Destination`]: Where a traverser is headed next, including the
//!   reserved halt sentinel
//! - [`ExecutionEngine`]: The runtime mode a pipeline executes under
//!
//! # Examples
//!
//! ```rust
//! use pathloom::types::{Destination, ExecutionEngine};
//!
//! let next = Destination::step("filter_adults");
//! assert!(!next.is_halt());
//!
//! // Encode for persistence
//! assert_eq!(next.encode(), "Step:filter_adults");
//! assert_eq!(Destination::decode("Halt"), Destination::Halt);
//!
//! let engine: ExecutionEngine = "local".parse().unwrap();
//! assert_eq!(engine, ExecutionEngine::Local);
//! ```

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Where a traverser is headed next in its pipeline.
///
/// A traverser's destination is either the label of the step that will
/// process it next, or the reserved [`Halt`](Self::Halt) sentinel marking
/// the traverser terminal. Once halted, a traverser may still be read for
/// its final value, path, and sack, but it is never advanced again.
///
/// # Persistence
///
/// `Destination` supports serialization for migration and checkpointing
/// through both serde and the [`encode`](Self::encode)/[`decode`](Self::decode)
/// methods.
///
/// # Examples
///
/// ```rust
/// use pathloom::types::Destination;
///
/// let step = Destination::step("count");
/// assert_eq!(step.step_label(), Some("count"));
///
/// let halt = Destination::Halt;
/// assert!(halt.is_halt());
/// assert_eq!(halt.step_label(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    /// Reserved sentinel: the traverser has passed through the whole
    /// pipeline and is terminal.
    Halt,

    /// The label of the step that will process the traverser next.
    Step(String),
}

impl Destination {
    /// Convenience constructor for a step destination.
    pub fn step(label: impl Into<String>) -> Self {
        Destination::Step(label.into())
    }

    /// Returns `true` if this is the halt sentinel.
    #[must_use]
    pub fn is_halt(&self) -> bool {
        matches!(self, Self::Halt)
    }

    /// Returns the step label, or `None` for the halt sentinel.
    #[must_use]
    pub fn step_label(&self) -> Option<&str> {
        match self {
            Self::Halt => None,
            Self::Step(label) => Some(label),
        }
    }

    /// Encode a destination into its persisted string form.
    ///
    /// - `Halt` → `"Halt"`
    /// - `Step("x")` → `"Step:x"`
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Destination::Halt => "Halt".to_string(),
            Destination::Step(label) => format!("Step:{label}"),
        }
    }

    /// Decode a persisted string form back into a destination.
    ///
    /// Unrecognized forms fall back to `Step(s)` so that step labels
    /// persisted by older writers keep routing.
    pub fn decode(s: &str) -> Self {
        if s == "Halt" {
            Destination::Halt
        } else if let Some(rest) = s.strip_prefix("Step:") {
            Destination::Step(rest.to_string())
        } else {
            Destination::Step(s.to_string())
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halt => write!(f, "<halt>"),
            Self::Step(label) => write!(f, "{label}"),
        }
    }
}

/// The runtime mode a pipeline executes under.
///
/// This is a closed enumeration: strategies and engine-aware steps branch
/// on it, and there is no out-of-range value expressible in safe code. The
/// only place an unknown engine name can appear is the string boundary,
/// where [`FromStr`] rejects it with [`UnknownEngineError`].
///
/// - [`Local`](Self::Local): sequential, single-process, step-by-step
///   evaluation.
/// - [`Distributed`](Self::Distributed): vertex-centric execution where one
///   pipeline instance runs per graph vertex and traversers migrate between
///   vertices as messages. A pipeline's side-effect store is vertex-local
///   scoped under this mode; graph-scoped side-effect state is cleared when
///   switching into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionEngine {
    /// Sequential single-process execution.
    Local,
    /// Vertex-centric distributed execution.
    Distributed,
}

impl fmt::Display for ExecutionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Distributed => write!(f, "distributed"),
        }
    }
}

/// Error for an engine name that is not part of the closed enumeration.
///
/// Supplying one is a programming defect in the caller's configuration,
/// not a runtime data problem.
#[derive(Debug, Error, Diagnostic)]
#[error("unknown execution engine: {name}")]
#[diagnostic(
    code(pathloom::types::unknown_engine),
    help("valid engines are \"local\" and \"distributed\"")
)]
pub struct UnknownEngineError {
    /// The rejected engine name.
    pub name: String,
}

impl FromStr for ExecutionEngine {
    type Err = UnknownEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" | "Local" | "LOCAL" => Ok(Self::Local),
            "distributed" | "Distributed" | "DISTRIBUTED" => Ok(Self::Distributed),
            other => Err(UnknownEngineError {
                name: other.to_string(),
            }),
        }
    }
}
