//! Process-wide codec extension registry.
//!
//! Extensions registered here are picked up by every codec built with
//! `auto_discover_extensions(true)`, letting a storage backend or an
//! application plug its value kinds into codecs it never constructs
//! itself.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use super::modules::CodecModule;

static EXTENSIONS: RwLock<Vec<Arc<dyn CodecModule>>> = RwLock::new(Vec::new());

/// Register an extension for auto-discovery.
///
/// Registering a module whose name is already present replaces the
/// earlier registration.
pub fn register_extension(module: Arc<dyn CodecModule>) {
    let mut extensions = EXTENSIONS.write();
    if let Some(existing) = extensions.iter_mut().find(|m| m.name() == module.name()) {
        debug!(name = module.name(), "replacing registered codec extension");
        *existing = module;
    } else {
        debug!(name = module.name(), "registering codec extension");
        extensions.push(module);
    }
}

/// Snapshot of every registered extension, in registration order.
#[must_use]
pub fn registered_extensions() -> Vec<Arc<dyn CodecModule>> {
    EXTENSIONS.read().clone()
}

/// Names of every registered extension, in registration order.
#[must_use]
pub fn registered_extension_names() -> Vec<&'static str> {
    EXTENSIONS.read().iter().map(|m| m.name()).collect()
}
