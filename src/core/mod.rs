//! Chart template registry core.

pub mod config;
pub mod error;
pub mod templates;

pub use error::Error;
