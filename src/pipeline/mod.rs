//! Pipeline definition: ordered steps, a shared side-effect store, and
//! the strategy hook that rewrites both before execution.
//!
//! A [`Pipeline`] is the compiled, executable form produced by
//! [`PipelineBuilder`]. Construction registers steps and seeds side
//! effects; compilation applies the registered
//! [`TraversalStrategy`](strategy::TraversalStrategy) passes for the
//! selected engine, after which the pipeline is ready to drive traversers.

pub mod builder;
pub mod step;
pub mod strategy;

pub use builder::PipelineBuilder;
pub use step::{EngineAware, Step, StepError};
pub use strategy::{EngineDependentStrategy, StrategyError, StrategySet, TraversalStrategy};

use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;

use crate::side_effects::SideEffects;

/// An ordered sequence of steps sharing one side-effect store.
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
    side_effects: Arc<SideEffects>,
}

impl Pipeline {
    pub(crate) fn from_parts(steps: Vec<Box<dyn Step>>, side_effects: Arc<SideEffects>) -> Self {
        Self {
            steps,
            side_effects,
        }
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the pipeline has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Label of the first step, where start traversers are seeded.
    #[must_use]
    pub fn first_label(&self) -> Option<&str> {
        self.steps.first().map(|s| s.label())
    }

    /// Step labels in pipeline order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.label()).collect()
    }

    /// Position of the step with `label`, if present.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.label() == label)
    }

    /// Mutable access to the step at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; pair with
    /// [`position`](Self::position).
    pub fn step_at_mut(&mut self, index: usize) -> &mut dyn Step {
        self.steps[index].as_mut()
    }

    /// Mutable iteration over steps in pipeline order, for strategies.
    pub fn steps_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Step>> {
        self.steps.iter_mut()
    }

    /// The shared side-effect store.
    #[must_use]
    pub fn side_effects(&self) -> &Arc<SideEffects> {
        &self.side_effects
    }

    /// Clone of the shared side-effect handle, for seeding traversers.
    #[must_use]
    pub fn side_effects_handle(&self) -> Arc<SideEffects> {
        Arc::clone(&self.side_effects)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.labels())
            .field("side_effects", &self.side_effects)
            .finish()
    }
}

/// Errors raised while building a pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    /// Two steps were registered under the same label.
    #[error("duplicate step label: {label}")]
    #[diagnostic(
        code(pathloom::pipeline::duplicate_step_label),
        help("step labels address routing targets and must be unique within a pipeline")
    )]
    DuplicateStepLabel {
        /// The colliding label.
        label: String,
    },

    /// A strategy failed while rewriting the pipeline.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Strategy(#[from] StrategyError),
}
