//! Sequential, single-process pipeline driver.
//!
//! This is the reference runtime for the [`Local`](ExecutionEngine::Local)
//! engine: one thread, one traverser mutated by at most one step at a
//! time, ownership transferring step-to-step. Distributed execution
//! replaces this loop with vertex-local pipeline instances and traverser
//! migration; the traverser and strategy contracts are the same either
//! way.
//!
//! The executor seeds traversers at the first step, routes each live
//! traverser to the step named by its destination, and collects halted
//! traversers as results. Halted traversers that satisfy the
//! merge-equality invariant are folded together so results arrive bulked
//! rather than enumerated.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info_span};
use uuid::Uuid;

use crate::pipeline::{Pipeline, StepError};
use crate::traverser::{Traverser, TraverserError};
use crate::types::{Destination, ExecutionEngine};
use crate::value::TraversalValue;

/// Tuning for a local run.
#[derive(Clone, Debug)]
pub struct ExecutorConfig {
    /// Merge mergeable halted traversers before returning them.
    pub merge_halted: bool,
    /// Upper bound on step invocations per run; `None` is unbounded.
    pub max_hops: Option<u64>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            merge_halted: true,
            max_hops: Self::resolve_max_hops(None),
        }
    }
}

impl ExecutorConfig {
    fn resolve_max_hops(provided: Option<u64>) -> Option<u64> {
        if provided.is_some() {
            return provided;
        }
        dotenvy::dotenv().ok();
        std::env::var("PATHLOOM_MAX_HOPS")
            .ok()
            .and_then(|raw| raw.parse().ok())
    }

    /// Builder-style hop budget.
    #[must_use]
    pub fn with_max_hops(mut self, max_hops: u64) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    /// Builder-style merge toggle.
    #[must_use]
    pub fn with_merge_halted(mut self, merge_halted: bool) -> Self {
        self.merge_halted = merge_halted;
        self
    }
}

/// Drives a compiled pipeline to completion on the current thread.
#[derive(Clone, Debug, Default)]
pub struct LocalExecutor {
    config: ExecutorConfig,
}

impl LocalExecutor {
    /// Creates an executor with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor with explicit configuration.
    #[must_use]
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Run `pipeline` over `start_values`, returning the halted
    /// traversers.
    ///
    /// Each start value becomes a traverser at the first step with loops
    /// zero and bulk one, bound to the pipeline's side-effect store. Step
    /// errors surface unchanged, wrapped only with the failing step's
    /// label.
    pub fn run(
        &self,
        pipeline: &mut Pipeline,
        start_values: Vec<TraversalValue>,
    ) -> Result<Vec<Traverser>, ExecutorError> {
        let span = info_span!(
            "traversal",
            traversal_id = %Uuid::new_v4(),
            engine = %ExecutionEngine::Local,
        );
        let _guard = span.enter();

        let first = pipeline
            .first_label()
            .ok_or(ExecutorError::EmptyPipeline)?
            .to_string();
        let side_effects = pipeline.side_effects_handle();

        let mut live: Vec<Traverser> = start_values
            .into_iter()
            .map(|value| {
                Traverser::new(value, Destination::step(first.clone()), side_effects.clone())
            })
            .collect();
        debug!(seeded = live.len(), first_step = %first, "seeded start traversers");

        let mut halted: Vec<Traverser> = Vec::new();
        let mut hops: u64 = 0;

        while let Some(traverser) = live.pop() {
            if traverser.is_halted() {
                halted.push(traverser);
                continue;
            }
            if let Some(budget) = self.config.max_hops {
                if hops >= budget {
                    return Err(ExecutorError::HopBudgetExhausted { budget });
                }
            }
            hops += 1;

            // A live traverser always names a step.
            let label = traverser
                .destination()
                .step_label()
                .unwrap_or_default()
                .to_string();
            let index = pipeline
                .position(&label)
                .ok_or_else(|| ExecutorError::UnknownStep {
                    label: label.clone(),
                })?;
            let outputs = pipeline
                .step_at_mut(index)
                .process(traverser)
                .map_err(|source| ExecutorError::Step { label, source })?;
            for out in outputs {
                if out.is_halted() {
                    halted.push(out);
                } else {
                    live.push(out);
                }
            }
        }

        if self.config.merge_halted {
            halted = merge_mergeable(halted)?;
        }
        debug!(results = halted.len(), hops, "traversal complete");
        Ok(halted)
    }
}

/// Fold mergeable traversers together, summing bulk.
fn merge_mergeable(traversers: Vec<Traverser>) -> Result<Vec<Traverser>, TraverserError> {
    let mut merged: Vec<Traverser> = Vec::with_capacity(traversers.len());
    for traverser in traversers {
        match merged.iter().position(|m| m.can_merge(&traverser)) {
            Some(index) => merged[index].admin().merge(traverser)?,
            None => merged.push(traverser),
        }
    }
    Ok(merged)
}

/// Errors raised by the local executor.
#[derive(Debug, Error, Diagnostic)]
pub enum ExecutorError {
    /// The pipeline has no steps to seed traversers at.
    #[error("cannot execute an empty pipeline")]
    #[diagnostic(code(pathloom::executor::empty_pipeline))]
    EmptyPipeline,

    /// A traverser was routed to a label no step answers to.
    #[error("no step answers to label {label}")]
    #[diagnostic(
        code(pathloom::executor::unknown_step),
        help("a step set a destination that does not exist in this pipeline")
    )]
    UnknownStep {
        /// The unroutable label.
        label: String,
    },

    /// The configured hop budget ran out before the traversal finished.
    #[error("hop budget of {budget} exhausted")]
    #[diagnostic(
        code(pathloom::executor::hop_budget),
        help("raise PATHLOOM_MAX_HOPS or check the pipeline for a loop that never exits")
    )]
    HopBudgetExhausted {
        /// The exhausted budget.
        budget: u64,
    },

    /// A step failed; the underlying error is surfaced unchanged.
    #[error("step {label} failed")]
    #[diagnostic(code(pathloom::executor::step))]
    Step {
        /// Label of the failing step.
        label: String,
        /// The step's own error.
        #[source]
        #[diagnostic_source]
        source: StepError,
    },

    /// Result bulking failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Traverser(#[from] TraverserError),
}
