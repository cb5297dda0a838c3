//! Resolution of the templates root and of each backend's root directory.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::BackendKind;

/// Environment variable naming the templates root
pub const TEMPLATES_DIR_ENV: &str = "CHART_TEMPLATES_DIR";

/// Trait for reading template configuration, allowing dependency injection for testing
pub trait TemplateConfigReader {
    fn get_template_dir(&self) -> Option<String>;
}

/// Production implementation that reads from environment variables
pub struct EnvTemplateConfigReader;

impl TemplateConfigReader for EnvTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        std::env::var(TEMPLATES_DIR_ENV).ok()
    }
}

/// Fixed-value implementation for tests and embedding hosts
pub struct StaticTemplateConfigReader(Option<String>);

impl StaticTemplateConfigReader {
    pub fn new(template_dir: Option<String>) -> Self {
        Self(template_dir)
    }
}

impl TemplateConfigReader for StaticTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Root directory and file extension one backend is scanned with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRoot {
    pub backend: BackendKind,
    pub root: PathBuf,
    /// Extension without the leading dot
    pub extension: String,
}

impl BackendRoot {
    /// Standard layout: `<templates_root>/<backend dir>` with the backend's extension
    pub fn standard(backend: BackendKind, templates_root: &Path) -> Self {
        Self {
            backend,
            root: templates_root.join(backend.dir_name()),
            extension: backend.extension().to_string(),
        }
    }

    /// Standard roots of every backend below `templates_root`
    pub fn all_standard(templates_root: &Path) -> Vec<Self> {
        BackendKind::all()
            .map(|backend| Self::standard(backend, templates_root))
            .collect()
    }
}

/// Locates the templates root directory
pub struct TemplateDir;

impl TemplateDir {
    /// Find the templates root.
    ///
    /// `custom_dir` wins when given, then the environment, then the standard
    /// search locations. When nothing exists the conventional `./templates`
    /// path is returned anyway, since a missing root only means an empty index.
    pub fn discover(config_reader: &dyn TemplateConfigReader, custom_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = custom_dir {
            debug!("Using custom templates directory: {}", dir.display());
            return dir.to_path_buf();
        }

        if let Some(dir) = config_reader.get_template_dir().filter(|d| !d.is_empty()) {
            debug!("Using templates directory from {}: {}", TEMPLATES_DIR_ENV, dir);
            return PathBuf::from(dir);
        }

        let found = Self::search_locations()
            .into_iter()
            .map(|location| location.join("templates"))
            .find(|candidate| candidate.is_dir());

        match found {
            Some(path) => {
                debug!("Auto-discovered templates directory: {}", path.display());
                path
            }
            None => {
                debug!("No templates directory found in standard locations");
                PathBuf::from("templates")
            }
        }
    }

    /// Get list of locations to search for a `templates/` directory
    fn search_locations() -> Vec<PathBuf> {
        let mut locations = Vec::new();

        if let Ok(current_dir) = std::env::current_dir() {
            locations.push(current_dir);
        }

        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                locations.push(exe_dir.to_path_buf());
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            locations.push(config_dir.join("chart-templates"));
        }

        locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_dir_wins() {
        let reader = StaticTemplateConfigReader::new(Some("/from/env".into()));
        let root = TemplateDir::discover(&reader, Some(Path::new("/custom")));
        assert_eq!(root, PathBuf::from("/custom"));
    }

    #[test]
    fn test_env_dir_used_without_custom() {
        let reader = StaticTemplateConfigReader::new(Some("/from/env".into()));
        assert_eq!(TemplateDir::discover(&reader, None), PathBuf::from("/from/env"));
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let reader = StaticTemplateConfigReader::new(Some(String::new()));
        let root = TemplateDir::discover(&reader, None);
        assert!(root.ends_with("templates"));
    }

    #[test]
    fn test_missing_dir_is_not_validated() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let reader = StaticTemplateConfigReader::new(None);
        assert_eq!(TemplateDir::discover(&reader, Some(&missing)), missing);
    }

    #[test]
    fn test_standard_backend_roots() {
        let roots = BackendRoot::all_standard(Path::new("/t"));
        assert_eq!(roots.len(), 4);
        assert_eq!(roots[0].root, PathBuf::from("/t/echarts_py"));
        assert_eq!(roots[0].extension, "py");
        assert_eq!(roots[2].backend, BackendKind::D3Js);
        assert_eq!(roots[2].root, PathBuf::from("/t/d3-js"));
        assert_eq!(roots[2].extension, "js");
    }
}
