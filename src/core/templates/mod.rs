//! Chart template discovery and resolution.
//!
//! This module finds chart templates below per-backend root directories,
//! reads the metadata block each template declares itself with, and resolves
//! chart types or chart names to the best matching template.
//!
//! The template system supports:
//! - Four rendering backends, one of them code-backed
//! - Recursive discovery with per-file failure isolation
//! - Exact, partial and similarity based lookups
//! - Injectable randomness for variant selection
//! - Factory-based loading of code-backed templates

pub mod dir;
pub mod index;
pub mod kind;
pub mod metadata;
pub mod picker;
pub mod registry;
pub mod renderable;
pub mod scanner;
pub mod types;

pub use dir::*;
pub use index::*;
pub use kind::*;
pub use metadata::*;
pub use picker::*;
pub use registry::*;
pub use renderable::*;
pub use scanner::*;
pub use types::*;
