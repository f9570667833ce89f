use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Binding, TransportPath};
use crate::resolver::CapabilitySource;

/// Typed handles registered by the host before resolution.
/// RwLock allows registration during startup + parallel reads.
pub struct Registry {
    bindings: RwLock<HashMap<String, Arc<dyn Binding>>>,
    module: String,
}

impl Registry {
    /// A registry probed for `module` at resolution time.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
            module: module.into(),
        }
    }

    pub fn register(&self, name: impl Into<String>, binding: Arc<dyn Binding>) {
        self.bindings.write().unwrap().insert(name.into(), binding);
    }

    pub fn unregister(&self, name: &str) {
        self.bindings.write().unwrap().remove(name);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Binding>> {
        self.bindings.read().unwrap().get(name).cloned()
    }
}

impl CapabilitySource for Registry {
    fn path(&self) -> TransportPath {
        TransportPath::Registry
    }

    fn probe(&self) -> Option<Arc<dyn Binding>> {
        self.get(&self.module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::mock::ScriptedBinding;

    #[test]
    fn probe_finds_registered_module() {
        let registry = Registry::new("Engine");
        registry.register("Engine", Arc::new(ScriptedBinding::new()));
        assert!(registry.probe().is_some());
    }

    #[test]
    fn probe_ignores_other_modules() {
        let registry = Registry::new("Engine");
        registry.register("Other", Arc::new(ScriptedBinding::new()));
        assert!(registry.probe().is_none());
    }

    #[test]
    fn unregister_removes_binding() {
        let registry = Registry::new("Engine");
        registry.register("Engine", Arc::new(ScriptedBinding::new()));
        registry.unregister("Engine");
        assert!(registry.probe().is_none());
    }
}
