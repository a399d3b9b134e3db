//! PipelineBuilder: fluent construction of executable pipelines.
//!
//! The builder registers steps and seeds the side-effect store; compiling
//! for an engine applies the registered strategies in order and yields a
//! [`Pipeline`] ready to drive traversers.

use std::sync::Arc;

use super::strategy::{StrategySet, TraversalStrategy};
use super::{Pipeline, PipelineError, Step};
use crate::side_effects::SideEffects;
use crate::types::ExecutionEngine;
use crate::value::TraversalValue;

/// Builder for pipelines.
///
/// # Examples
///
/// ```rust
/// use pathloom::pipeline::{PipelineBuilder, Step, StepError};
/// use pathloom::traverser::Traverser;
/// use pathloom::types::{Destination, ExecutionEngine};
///
/// struct HaltAll {
///     label: String,
/// }
///
/// impl Step for HaltAll {
///     fn label(&self) -> &str {
///         &self.label
///     }
///
///     fn process(&mut self, mut t: Traverser) -> Result<Vec<Traverser>, StepError> {
///         t.admin().set_destination(Destination::Halt);
///         Ok(vec![t])
///     }
/// }
///
/// let pipeline = PipelineBuilder::new()
///     .add_step(HaltAll { label: "sink".into() })
///     .compile(ExecutionEngine::Local)
///     .unwrap();
/// assert_eq!(pipeline.first_label(), Some("sink"));
/// ```
pub struct PipelineBuilder {
    steps: Vec<Box<dyn Step>>,
    side_effects: Arc<SideEffects>,
    strategies: StrategySet,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    /// Creates an empty builder with the default strategy set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            side_effects: SideEffects::shared(),
            strategies: StrategySet::default(),
        }
    }

    /// Append a step to the pipeline.
    ///
    /// Traversers are routed by step label; labels must be unique, which
    /// [`compile`](Self::compile) enforces.
    #[must_use]
    pub fn add_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Seed a plain side-effect entry.
    #[must_use]
    pub fn with_side_effect(self, key: impl Into<String>, value: TraversalValue) -> Self {
        self.side_effects.set(key, value);
        self
    }

    /// Seed a graph-scoped side-effect entry.
    ///
    /// Graph-scoped entries are cleared by the engine-dependent rewrite
    /// when compiling for distributed execution.
    #[must_use]
    pub fn with_graph_scoped_side_effect(
        self,
        key: impl Into<String>,
        value: TraversalValue,
    ) -> Self {
        self.side_effects.set_graph_scoped(key, value);
        self
    }

    /// Register an additional strategy after the defaults.
    #[must_use]
    pub fn add_strategy(mut self, strategy: Arc<dyn TraversalStrategy>) -> Self {
        self.strategies.register(strategy);
        self
    }

    /// Replace the whole strategy set.
    #[must_use]
    pub fn with_strategies(mut self, strategies: StrategySet) -> Self {
        self.strategies = strategies;
        self
    }

    /// Compile into an executable pipeline for `engine`.
    ///
    /// Validates step-label uniqueness, then applies the registered
    /// strategies in registration order.
    pub fn compile(self, engine: ExecutionEngine) -> Result<Pipeline, PipelineError> {
        for (i, step) in self.steps.iter().enumerate() {
            let label = step.label();
            if self.steps[..i].iter().any(|s| s.label() == label) {
                return Err(PipelineError::DuplicateStepLabel {
                    label: label.to_string(),
                });
            }
        }
        let mut pipeline = Pipeline::from_parts(self.steps, self.side_effects);
        self.strategies.apply_all(&mut pipeline, engine)?;
        Ok(pipeline)
    }
}

impl std::fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field(
                "steps",
                &self.steps.iter().map(|s| s.label()).collect::<Vec<_>>(),
            )
            .field("strategies", &self.strategies)
            .finish()
    }
}
