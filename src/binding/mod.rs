pub mod mock;
pub mod module_table;
pub mod process;
pub mod registry;

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{BridgeError, Result};

/// A live connection to the compute engine. Speaks transport text only.
#[async_trait]
pub trait Binding: Send + Sync {
    async fn execute(&self, request: &str) -> Result<String>;
    async fn home_dir(&self) -> Result<PathBuf>;
}

/// Which of the two ways of reaching the engine was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportPath {
    /// Handle registered up front in a typed [`registry::Registry`].
    Registry,
    /// Handle looked up by name in a legacy [`module_table::ModuleTable`].
    ModuleTable,
}

impl fmt::Display for TransportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportPath::Registry => write!(f, "registry"),
            TransportPath::ModuleTable => write!(f, "module table"),
        }
    }
}

/// The outcome of resolution. Immutable once built.
pub enum BindingHandle {
    Linked {
        path: TransportPath,
        binding: Arc<dyn Binding>,
    },
    /// Nothing was found. Every use fails with a linking error.
    Unlinked,
}

impl BindingHandle {
    pub fn binding(&self) -> Result<&Arc<dyn Binding>> {
        match self {
            BindingHandle::Linked { binding, .. } => Ok(binding),
            BindingHandle::Unlinked => Err(BridgeError::Linking),
        }
    }

    pub fn path(&self) -> Option<TransportPath> {
        match self {
            BindingHandle::Linked { path, .. } => Some(*path),
            BindingHandle::Unlinked => None,
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, BindingHandle::Linked { .. })
    }
}

impl fmt::Debug for BindingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingHandle::Linked { path, .. } => f.debug_struct("Linked").field("path", path).finish(),
            BindingHandle::Unlinked => write!(f, "Unlinked"),
        }
    }
}
