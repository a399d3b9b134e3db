//! Traversal strategies: pluggable rewrite passes applied to a pipeline
//! before execution.
//!
//! A strategy inspects or mutates a pipeline's step sequence and
//! side-effect store as a function of the selected execution engine.
//! Strategies are stateless (all state they touch belongs to the
//! pipeline being rewritten) and must be idempotent under repeated
//! application with the same engine: re-applying to an already-rewritten
//! pipeline is a correctness requirement, not a convenience.
//!
//! Strategies are applied in a fixed, documented order: the registration
//! order of their [`StrategySet`]. The engine-dependent rewrite shipped
//! here has no ordering dependency and may run at any point before
//! execution begins.

use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

use super::Pipeline;
use crate::types::ExecutionEngine;

/// A rewrite/configuration pass over a pipeline.
///
/// Implementations are ideally singletons; they carry no per-invocation
/// mutable state of their own.
pub trait TraversalStrategy: Send + Sync {
    /// Name used in diagnostics and trace output.
    fn name(&self) -> &'static str;

    /// Inspect or rewrite `pipeline` for execution under `engine`.
    ///
    /// Must not fail for an empty or already-rewritten pipeline, and must
    /// be idempotent under repeated application with the same engine.
    fn apply(&self, pipeline: &mut Pipeline, engine: ExecutionEngine)
    -> Result<(), StrategyError>;
}

/// The engine-dependent rewrite.
///
/// Under [`ExecutionEngine::Distributed`] the pipeline's graph-scoped
/// side-effect state is cleared: distributed execution does not get a free
/// globally-consistent side-effect store, so anything bound to the local
/// graph instance must go before traversers start migrating. Under either
/// engine, every step that declares itself engine-aware is notified of the
/// selected engine, in step order, so it can switch internal algorithm
/// variants.
#[derive(Debug)]
pub struct EngineDependentStrategy;

static INSTANCE: EngineDependentStrategy = EngineDependentStrategy;

impl EngineDependentStrategy {
    /// The shared singleton instance.
    #[must_use]
    pub fn instance() -> &'static Self {
        &INSTANCE
    }
}

impl TraversalStrategy for EngineDependentStrategy {
    fn name(&self) -> &'static str {
        "engine-dependent"
    }

    fn apply(
        &self,
        pipeline: &mut Pipeline,
        engine: ExecutionEngine,
    ) -> Result<(), StrategyError> {
        if engine == ExecutionEngine::Distributed {
            let dropped = pipeline.side_effects().clear_graph_scope();
            if dropped > 0 {
                debug!(dropped, "cleared graph-scoped side effects for distributed execution");
            }
        }
        for step in pipeline.steps_mut() {
            if let Some(aware) = step.as_engine_aware() {
                aware.on_engine(engine);
            }
        }
        Ok(())
    }
}

/// An ordered collection of strategies.
///
/// Application order is registration order. The default set contains the
/// [`EngineDependentStrategy`].
#[derive(Clone)]
pub struct StrategySet {
    strategies: Vec<Arc<dyn TraversalStrategy>>,
}

impl Default for StrategySet {
    fn default() -> Self {
        Self {
            strategies: vec![Arc::new(EngineDependentStrategy)],
        }
    }
}

impl StrategySet {
    /// Creates an empty set, for pipelines that opt out of the defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Register a strategy at the end of the application order.
    pub fn register(&mut self, strategy: Arc<dyn TraversalStrategy>) -> &mut Self {
        self.strategies.push(strategy);
        self
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn TraversalStrategy>) -> Self {
        self.register(strategy);
        self
    }

    /// Names in application order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns `true` if no strategies are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Apply every registered strategy to `pipeline`, in order.
    #[instrument(skip(self, pipeline), fields(engine = %engine), err)]
    pub fn apply_all(
        &self,
        pipeline: &mut Pipeline,
        engine: ExecutionEngine,
    ) -> Result<(), StrategyError> {
        for strategy in &self.strategies {
            debug!(strategy = strategy.name(), "applying traversal strategy");
            strategy.apply(pipeline, engine)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for StrategySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategySet")
            .field("strategies", &self.names())
            .finish()
    }
}

/// Errors raised by strategy application.
#[derive(Debug, Error, Diagnostic)]
pub enum StrategyError {
    /// A strategy could not complete its rewrite.
    #[error("strategy {name} failed: {message}")]
    #[diagnostic(code(pathloom::strategy::failed))]
    Failed {
        /// Name of the failing strategy.
        name: &'static str,
        /// What went wrong.
        message: String,
    },
}
