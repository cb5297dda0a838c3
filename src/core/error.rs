//! Error handling for the chart template registry.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Per-file scan outcomes use the
//! narrower [`MetadataError`](crate::core::templates::MetadataError) and never
//! surface through this type; a failed lookup is an `Option::None`, not an error.
//!
//! # Examples
//!
//! ```
//! use chart_templates::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::config("no templates root"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for registry operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// A code-backed template failed to produce output
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(msg: S) -> Self {
        Self::Render(msg.into())
    }
}
