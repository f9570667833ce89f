//! One-time selection of the transport path to the engine.
//!
//! The typed registry is probed first, the legacy module table second.
//! Whatever is found first wins for the rest of the process; when nothing
//! is found the handle is [`BindingHandle::Unlinked`] and the failure
//! surfaces on first use, never here.

use std::sync::{Arc, OnceLock};

use crate::binding::{Binding, BindingHandle, TransportPath};

/// One place a binding might come from.
pub trait CapabilitySource: Send + Sync {
    fn path(&self) -> TransportPath;
    fn probe(&self) -> Option<Arc<dyn Binding>>;
}

#[derive(Default)]
pub struct Resolver {
    registry: Option<Arc<dyn CapabilitySource>>,
    module_table: Option<Arc<dyn CapabilitySource>>,
    handle: OnceLock<Arc<BindingHandle>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(mut self, registry: Arc<dyn CapabilitySource>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_module_table(mut self, table: Arc<dyn CapabilitySource>) -> Self {
        self.module_table = Some(table);
        self
    }

    /// Probe once, then hand out the same handle forever.
    pub fn resolve(&self) -> Arc<BindingHandle> {
        Arc::clone(self.handle.get_or_init(|| Arc::new(self.probe())))
    }

    fn probe(&self) -> BindingHandle {
        for source in [&self.registry, &self.module_table].into_iter().flatten() {
            if let Some(binding) = source.probe() {
                let path = source.path();
                tracing::info!(%path, "engine binding resolved");
                return BindingHandle::Linked { path, binding };
            }
        }
        tracing::warn!("no engine binding found; calls will fail with a linking error");
        BindingHandle::Unlinked
    }
}
