//! Scripted steps used across the integration suites.

use parking_lot::Mutex;
use pathloom::pipeline::{EngineAware, Step, StepError};
use pathloom::traverser::Traverser;
use pathloom::types::{Destination, ExecutionEngine};
use pathloom::value::TraversalValue;
use std::sync::Arc;

/// Forwards every traverser to a fixed next destination unchanged.
pub struct RouteStep {
    label: String,
    next: Destination,
}

impl RouteStep {
    pub fn new(label: &str, next: Destination) -> Self {
        Self {
            label: label.to_string(),
            next,
        }
    }
}

impl Step for RouteStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn process(&mut self, mut t: Traverser) -> Result<Vec<Traverser>, StepError> {
        t.admin().set_destination(self.next.clone());
        Ok(vec![t])
    }
}

/// Doubles integer values, then forwards.
pub struct DoubleStep {
    label: String,
    next: Destination,
}

impl DoubleStep {
    pub fn new(label: &str, next: Destination) -> Self {
        Self {
            label: label.to_string(),
            next,
        }
    }
}

impl Step for DoubleStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn process(&mut self, mut t: Traverser) -> Result<Vec<Traverser>, StepError> {
        let doubled = match t.value() {
            TraversalValue::Int(i) => TraversalValue::Int(i * 2),
            _ => return Err(StepError::MissingInput { what: "int value" }),
        };
        t.admin().set(doubled);
        t.admin().set_destination(self.next.clone());
        Ok(vec![t])
    }
}

/// Emits one child per configured value, extending the path under this
/// step's label.
pub struct FanOutStep {
    label: String,
    next: Destination,
    fan: Vec<i64>,
}

impl FanOutStep {
    pub fn new(label: &str, next: Destination, fan: Vec<i64>) -> Self {
        Self {
            label: label.to_string(),
            next,
            fan,
        }
    }
}

impl Step for FanOutStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn process(&mut self, mut t: Traverser) -> Result<Vec<Traverser>, StepError> {
        let mut children = Vec::with_capacity(self.fan.len());
        for i in &self.fan {
            let mut child = t
                .admin()
                .split_with(self.label.clone(), TraversalValue::Int(*i));
            child.admin().set_destination(self.next.clone());
            children.push(child);
        }
        Ok(children)
    }
}

/// Records every engine notification it receives, observable from outside
/// the pipeline through a shared handle.
pub struct EngineProbeStep {
    label: String,
    next: Destination,
    notifications: Arc<Mutex<Vec<ExecutionEngine>>>,
}

impl EngineProbeStep {
    pub fn new(label: &str, next: Destination) -> (Self, Arc<Mutex<Vec<ExecutionEngine>>>) {
        let notifications = Arc::new(Mutex::new(Vec::new()));
        let step = Self {
            label: label.to_string(),
            next,
            notifications: Arc::clone(&notifications),
        };
        (step, notifications)
    }
}

impl Step for EngineProbeStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn process(&mut self, mut t: Traverser) -> Result<Vec<Traverser>, StepError> {
        t.admin().set_destination(self.next.clone());
        Ok(vec![t])
    }

    fn as_engine_aware(&mut self) -> Option<&mut dyn EngineAware> {
        Some(self)
    }
}

impl EngineAware for EngineProbeStep {
    fn on_engine(&mut self, engine: ExecutionEngine) {
        self.notifications.lock().push(engine);
    }
}

/// Always fails.
pub struct FailingStep {
    label: String,
}

impl FailingStep {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}

impl Step for FailingStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn process(&mut self, _t: Traverser) -> Result<Vec<Traverser>, StepError> {
        Err(StepError::Failed("scripted failure".to_string()))
    }
}
