//! Records stored in the template index and returned by resolution.

// Internal imports (std, crate)
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{BackendKind, Renderable, TemplateMetadata};

/// How the rendering pipeline gets hold of a template
#[derive(Clone)]
pub enum TemplateHandle {
    /// Loaded unit of a code-backed backend
    Loaded {
        path: PathBuf,
        unit: Arc<dyn Renderable>,
    },
    /// Path of a markup/script template, rendered by the pipeline itself
    File(PathBuf),
}

impl TemplateHandle {
    /// Path of the file the handle was built from
    pub fn path(&self) -> &Path {
        match self {
            Self::Loaded { path, .. } => path,
            Self::File(path) => path,
        }
    }

    /// The loaded unit, for code-backed templates
    pub fn renderable(&self) -> Option<&Arc<dyn Renderable>> {
        match self {
            Self::Loaded { unit, .. } => Some(unit),
            Self::File(_) => None,
        }
    }
}

impl fmt::Debug for TemplateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { path, .. } => f.debug_tuple("Loaded").field(path).finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl PartialEq for TemplateHandle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Loaded { path: a, unit: x }, Self::Loaded { path: b, unit: y }) => {
                a == b && Arc::ptr_eq(x, y)
            }
            (Self::File(a), Self::File(b)) => a == b,
            _ => false,
        }
    }
}

/// One indexed template
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRecord {
    pub backend: BackendKind,
    pub handle: TemplateHandle,
    pub requirements: TemplateMetadata,
}

/// Result of a successful lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTemplate {
    pub backend: BackendKind,
    /// Index key of the chart type the template is registered under
    pub chart_type: String,
    /// Index key of the chart name the template is registered under
    pub chart_name: String,
    pub handle: TemplateHandle,
    pub requirements: TemplateMetadata,
}

impl ResolvedTemplate {
    pub(crate) fn from_record(chart_type: &str, chart_name: &str, record: &TemplateRecord) -> Self {
        Self {
            backend: record.backend,
            chart_type: chart_type.to_string(),
            chart_name: chart_name.to_string(),
            handle: record.handle.clone(),
            requirements: record.requirements.clone(),
        }
    }

    /// The `(backend, handle)` pair the rendering pipeline consumes
    pub fn into_parts(self) -> (BackendKind, TemplateHandle) {
        (self.backend, self.handle)
    }
}
