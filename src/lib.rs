//! Chart template registry.
//!
//! Indexes chart templates written for several rendering backends and resolves
//! a requested chart type or chart name to the template the chart pipeline
//! should render with.
//!
//! ```no_run
//! use chart_templates::{RegistryConfig, RenderableRegistry, TemplateRegistry};
//!
//! let registry = TemplateRegistry::new(RegistryConfig::new("templates"), RenderableRegistry::new());
//! registry.initialize();
//!
//! if let Some(template) = registry.resolve_by_type("bar", None) {
//!     println!("{} {}", template.backend, template.handle.path().display());
//! }
//! ```
#![deny(unsafe_code)]

pub mod core;

pub use crate::core::config::RegistryConfig;
pub use crate::core::error::{Error, Result};
pub use crate::core::templates::{
    BackendKind, Renderable, RenderableRegistry, ResolvedTemplate, TemplateHandle, TemplateIndex,
    TemplateRegistry,
};
