//! Registry configuration.
//!
//! Configuration is assembled from, in increasing priority: built-in defaults,
//! an optional TOML file, the `CHART_TEMPLATES_DIR` environment variable and
//! an explicit templates directory passed by the caller.
//!
//! ```toml
//! templates_dir = "charts/templates"
//! preference = ["echarts-js", "d3-js"]
//!
//! [backends.d3-js]
//! root = "/opt/d3-templates"
//! extension = "mjs"
//! ```
//!
//! Relative `templates_dir` values are resolved against the config file's
//! directory; relative backend roots against the templates root.

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::core::templates::{BackendKind, BackendRoot, TemplateConfigReader, TemplateDir};

// External imports (alphabetized)
use serde::Deserialize;
use tracing::debug;

/// File name looked up in the user's config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    templates_dir: Option<PathBuf>,
    preference: Option<Vec<BackendKind>>,
    backends: BTreeMap<BackendKind, BackendOverride>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BackendOverride {
    root: Option<PathBuf>,
    extension: Option<String>,
}

/// Resolved configuration of a [`TemplateRegistry`](crate::core::templates::TemplateRegistry)
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    pub templates_root: PathBuf,
    /// Roots scanned, one per backend
    pub backends: Vec<BackendRoot>,
    /// Backend order used by type resolution when the caller names none
    pub preference: Vec<BackendKind>,
}

impl RegistryConfig {
    /// Default layout below `templates_root`
    pub fn new(templates_root: impl Into<PathBuf>) -> Self {
        let templates_root = templates_root.into();
        Self {
            backends: BackendRoot::all_standard(&templates_root),
            preference: BackendKind::default_preference(),
            templates_root,
        }
    }

    /// Replace the default backend preference
    pub fn with_preference(mut self, preference: Vec<BackendKind>) -> Self {
        self.preference = preference;
        self
    }

    /// Root configuration of `backend`, if it is scanned at all
    pub fn backend_root(&self, backend: BackendKind) -> Option<&BackendRoot> {
        self.backends.iter().find(|root| root.backend == backend)
    }

    /// Parse a TOML configuration whose relative paths are based at `base_dir`
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Self::from_file_at(file, base_dir)
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let file = read_config_file(path)?;
        Self::from_file_at(file, path.parent().unwrap_or_else(|| Path::new(".")))
    }

    fn from_file_at(file: ConfigFile, base_dir: &Path) -> Result<Self> {
        let templates_root = file_templates_root(&file, base_dir);
        Self::from_file(file, templates_root)
    }

    /// Assemble the configuration from every source.
    ///
    /// `config_path` is loaded when given; otherwise the user config file is
    /// used if present. `templates_dir` and the environment override the root
    /// named by the file. Without any of them the search locations of
    /// [`TemplateDir::discover`] are tried.
    pub fn discover(
        config_reader: &dyn TemplateConfigReader,
        config_path: Option<&Path>,
        templates_dir: Option<&Path>,
    ) -> Result<Self> {
        let file_source = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.is_file()),
        };

        let (file, file_root) = match file_source {
            Some(path) => {
                let file = read_config_file(&path)?;
                let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
                let root = file_templates_root(&file, base_dir);
                (file, Some(root))
            }
            None => (ConfigFile::default(), None),
        };

        let explicit = templates_dir.map(Path::to_path_buf);
        let from_env = config_reader
            .get_template_dir()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        let templates_root = match explicit.or(from_env).or(file_root) {
            Some(root) => root,
            None => TemplateDir::discover(config_reader, None),
        };

        Self::from_file(file, templates_root)
    }

    fn from_file(file: ConfigFile, templates_root: PathBuf) -> Result<Self> {
        let mut config = Self::new(templates_root);

        if let Some(preference) = file.preference {
            if preference.is_empty() {
                return Err(Error::config("backend preference must not be empty"));
            }
            config.preference = preference;
        }

        for (backend, over) in file.backends {
            let templates_root = config.templates_root.clone();
            let Some(root) = config.backends.iter_mut().find(|r| r.backend == backend) else {
                continue;
            };
            if let Some(dir) = over.root {
                root.root = templates_root.join(dir);
            }
            if let Some(extension) = over.extension {
                let extension = extension.trim_start_matches('.').to_string();
                if extension.is_empty() {
                    return Err(Error::config(format!(
                        "extension for backend {backend} must not be empty"
                    )));
                }
                root.extension = extension;
            }
        }

        Ok(config)
    }
}

/// Templates root named by a config file, `templates` next to it by default
fn file_templates_root(file: &ConfigFile, base_dir: &Path) -> PathBuf {
    file.templates_dir
        .as_deref()
        .map(|dir| base_dir.join(dir))
        .unwrap_or_else(|| base_dir.join("templates"))
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    debug!(config_path = %path.display(), "Loading registry configuration");
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Location of the per-user configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chart-templates").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::templates::StaticTemplateConfigReader;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::new("/t");
        assert_eq!(config.templates_root, PathBuf::from("/t"));
        assert_eq!(config.backends.len(), 4);
        assert_eq!(config.preference, BackendKind::default_preference());
        assert_eq!(
            config.backend_root(BackendKind::VegalitePy).unwrap().root,
            PathBuf::from("/t/vegalite_py")
        );
    }

    #[test]
    fn test_from_toml_overrides() {
        let content = r#"
templates_dir = "charts"
preference = ["d3-js", "echarts-js"]

[backends.d3-js]
root = "/opt/d3"
extension = ".mjs"

[backends.echarts_py]
root = "py"
"#;
        let config = RegistryConfig::from_toml_str(content, Path::new("/etc/ct")).unwrap();
        assert_eq!(config.templates_root, PathBuf::from("/etc/ct/charts"));
        assert_eq!(
            config.preference,
            vec![BackendKind::D3Js, BackendKind::EchartsJs]
        );

        let d3 = config.backend_root(BackendKind::D3Js).unwrap();
        assert_eq!(d3.root, PathBuf::from("/opt/d3"));
        assert_eq!(d3.extension, "mjs");

        let py = config.backend_root(BackendKind::EchartsPy).unwrap();
        assert_eq!(py.root, PathBuf::from("/etc/ct/charts/py"));
        assert_eq!(py.extension, "py");
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = RegistryConfig::from_toml_str("[backends.plotly]\nroot = \"x\"\n", Path::new("."));
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_empty_preference_rejected() {
        let result = RegistryConfig::from_toml_str("preference = []\n", Path::new("."));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = RegistryConfig::load(Path::new("/definitely/not/here.toml"));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_discover_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "templates_dir = \"from_file\"\n").unwrap();

        let no_env = StaticTemplateConfigReader::new(None);
        let config = RegistryConfig::discover(&no_env, Some(&config_path), None).unwrap();
        assert_eq!(config.templates_root, temp_dir.path().join("from_file"));

        let env = StaticTemplateConfigReader::new(Some("/from/env".into()));
        let config = RegistryConfig::discover(&env, Some(&config_path), None).unwrap();
        assert_eq!(config.templates_root, PathBuf::from("/from/env"));

        let config =
            RegistryConfig::discover(&env, Some(&config_path), Some(Path::new("/explicit")))
                .unwrap();
        assert_eq!(config.templates_root, PathBuf::from("/explicit"));
        assert_eq!(
            config.backend_root(BackendKind::EchartsJs).unwrap().root,
            PathBuf::from("/explicit/echarts-js")
        );
    }

    #[test]
    fn test_config_file_without_templates_dir_agrees_with_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "preference = [\"d3-js\"]\n").unwrap();

        let no_env = StaticTemplateConfigReader::new(None);
        let discovered = RegistryConfig::discover(&no_env, Some(&config_path), None).unwrap();
        let loaded = RegistryConfig::load(&config_path).unwrap();

        assert_eq!(discovered, loaded);
        assert_eq!(discovered.templates_root, temp_dir.path().join("templates"));
        assert_eq!(discovered.preference, vec![BackendKind::D3Js]);
    }
}
