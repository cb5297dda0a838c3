//! Code-backed template units and the factories that load them.
//!
//! Templates of code-backed backends are not handed to the pipeline as paths.
//! They are turned into [`Renderable`] values by factories registered once at
//! startup, keyed by the template's file path. A catch-all fallback factory can
//! be installed for plugin hosts that can load any file of a backend.
//! Files no factory claims are indexed by path like file-backed templates.

// Internal imports (std, crate)
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::error::{Error, Result};

use super::{BackendKind, TemplateMetadata};

// External imports (alphabetized)
use serde_json::Value as JsonValue;

/// A loaded, executable chart template
pub trait Renderable: Send + Sync {
    /// Produce the chart document for `data`
    fn render(&self, data: &JsonValue) -> Result<String>;
}

impl fmt::Debug for dyn Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Renderable")
    }
}

/// Everything a factory learns about the file it is asked to load
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest<'a> {
    pub backend: BackendKind,
    pub path: &'a Path,
    pub metadata: &'a TemplateMetadata,
}

/// Builds a [`Renderable`] for one template file
pub type RenderableFactory =
    Arc<dyn Fn(&LoadRequest<'_>) -> Result<Arc<dyn Renderable>> + Send + Sync>;

/// Registry of factories used to load code-backed templates
#[derive(Clone, Default)]
pub struct RenderableRegistry {
    factories: HashMap<PathBuf, RenderableFactory>,
    fallback: Option<RenderableFactory>,
}

impl RenderableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the factory for the template at `path`
    pub fn register<P, F>(&mut self, path: P, factory: F)
    where
        P: Into<PathBuf>,
        F: Fn(&LoadRequest<'_>) -> Result<Arc<dyn Renderable>> + Send + Sync + 'static,
    {
        self.factories.insert(path.into(), Arc::new(factory));
    }

    /// Register a shared renderable that is returned as-is for `path`
    pub fn register_instance<P: Into<PathBuf>>(&mut self, path: P, renderable: Arc<dyn Renderable>) {
        self.register(path, move |_| Ok(Arc::clone(&renderable)));
    }

    /// Install the factory used for files without an explicit registration
    pub fn set_fallback<F>(&mut self, factory: F)
    where
        F: Fn(&LoadRequest<'_>) -> Result<Arc<dyn Renderable>> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(factory));
    }

    /// Check if a factory would be found for `path`
    pub fn can_load(&self, path: &Path) -> bool {
        self.fallback.is_some() || self.factories.contains_key(path)
    }

    /// Number of explicitly registered paths
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty() && self.fallback.is_none()
    }

    /// Load the template described by `request`
    pub fn load(&self, request: &LoadRequest<'_>) -> Result<Arc<dyn Renderable>> {
        let factory = self
            .factories
            .get(request.path)
            .or(self.fallback.as_ref())
            .ok_or_else(|| {
                Error::template(format!(
                    "no renderable factory registered for {}",
                    request.path.display()
                ))
            })?;
        factory(request)
    }
}

impl fmt::Debug for RenderableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderableRegistry")
            .field("paths", &self.factories.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
