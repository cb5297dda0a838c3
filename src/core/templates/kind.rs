//! Rendering backend definitions for chart templates.
//!
//! Every chart template is written for exactly one backend. A backend owns one
//! root directory under the templates root and one file extension. Only
//! `echarts_py` is code-backed (templates are loaded as
//! [`Renderable`](super::Renderable) units); the others are file-backed and
//! handed to the pipeline as paths.
//!
//! # Examples
//!
//! ```
//! use chart_templates::core::templates::BackendKind;
//! use std::str::FromStr;
//!
//! let backend = BackendKind::from_str("D3-JS").unwrap();
//! assert_eq!(backend, BackendKind::D3Js);
//! assert_eq!(backend.as_str(), "d3-js");
//! assert_eq!(backend.extension(), "js");
//! assert!(!backend.is_code_backed());
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// Rendering backends a chart template can target.
///
/// Declaration order is the natural iteration order of the template index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum BackendKind {
    /// ECharts options built by Python code
    #[serde(rename = "echarts_py")]
    EchartsPy,
    /// ECharts options written as JavaScript
    #[serde(rename = "echarts-js")]
    EchartsJs,
    /// D3 scripts
    #[serde(rename = "d3-js")]
    D3Js,
    /// Vega-Lite specs built by Python code
    #[serde(rename = "vegalite_py")]
    VegalitePy,
}

impl BackendKind {
    /// Returns the backend identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EchartsPy => "echarts_py",
            Self::EchartsJs => "echarts-js",
            Self::D3Js => "d3-js",
            Self::VegalitePy => "vegalite_py",
        }
    }

    /// Directory name of this backend below the templates root
    pub fn dir_name(&self) -> &'static str {
        self.as_str()
    }

    /// File extension (without the dot) template files must carry
    pub fn extension(&self) -> &'static str {
        match self {
            Self::EchartsPy | Self::VegalitePy => "py",
            Self::EchartsJs | Self::D3Js => "js",
        }
    }

    /// Whether templates of this backend are loaded as executable units
    pub fn is_code_backed(&self) -> bool {
        matches!(self, Self::EchartsPy)
    }

    /// Whether `__`-prefixed package-init files are ignored in this backend
    pub fn skips_init_files(&self) -> bool {
        self.extension() == "py"
    }

    /// Returns an iterator over all backends in natural index order
    pub fn all() -> impl Iterator<Item = Self> {
        use BackendKind::*;
        [EchartsPy, EchartsJs, D3Js, VegalitePy].iter().copied()
    }

    /// Backend order consulted by type resolution when the caller names none
    pub fn default_preference() -> Vec<Self> {
        vec![Self::EchartsPy, Self::EchartsJs, Self::D3Js]
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "echarts_py" => Ok(BackendKind::EchartsPy),
            "echarts-js" => Ok(BackendKind::EchartsJs),
            "d3-js" => Ok(BackendKind::D3Js),
            "vegalite_py" => Ok(BackendKind::VegalitePy),
            _ => Err(format!("Unknown backend: {s}")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_as_str_matches_display() {
        for backend in BackendKind::all() {
            assert_eq!(backend.to_string(), backend.as_str());
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "echarts_py".parse::<BackendKind>().unwrap(),
            BackendKind::EchartsPy
        );
        assert_eq!(
            "echarts-js".parse::<BackendKind>().unwrap(),
            BackendKind::EchartsJs
        );
        assert_eq!("d3-js".parse::<BackendKind>().unwrap(), BackendKind::D3Js);
        assert_eq!(
            "VEGALITE_PY".parse::<BackendKind>().unwrap(),
            BackendKind::VegalitePy
        );
    }

    #[test]
    fn test_from_str_invalid() {
        let result = "matplotlib".parse::<BackendKind>();
        assert_eq!(result.unwrap_err(), "Unknown backend: matplotlib");
        assert!("echarts_js".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_extensions_and_code_backing() {
        assert_eq!(BackendKind::EchartsPy.extension(), "py");
        assert_eq!(BackendKind::VegalitePy.extension(), "py");
        assert_eq!(BackendKind::EchartsJs.extension(), "js");
        assert_eq!(BackendKind::D3Js.extension(), "js");

        let code_backed: Vec<_> = BackendKind::all().filter(|b| b.is_code_backed()).collect();
        assert_eq!(code_backed, vec![BackendKind::EchartsPy]);
    }

    #[test]
    fn test_python_backends_skip_init_files() {
        let skipping: Vec<_> = BackendKind::all()
            .filter(|b| b.skips_init_files())
            .collect();
        assert_eq!(
            skipping,
            vec![BackendKind::EchartsPy, BackendKind::VegalitePy]
        );
        assert!(!BackendKind::VegalitePy.is_code_backed());
    }

    #[test]
    fn test_all_is_natural_order() {
        let all: Vec<_> = BackendKind::all().collect();
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
        assert_eq!(all.iter().collect::<HashSet<_>>().len(), 4);
    }

    #[test]
    fn test_default_preference_excludes_vegalite() {
        let preference = BackendKind::default_preference();
        assert_eq!(preference.first(), Some(&BackendKind::EchartsPy));
        assert!(!preference.contains(&BackendKind::VegalitePy));
    }

    #[test]
    fn test_serde_uses_identifiers() {
        let json = serde_json::to_string(&BackendKind::EchartsJs).unwrap();
        assert_eq!(json, "\"echarts-js\"");
        let parsed: BackendKind = serde_json::from_str("\"vegalite_py\"").unwrap();
        assert_eq!(parsed, BackendKind::VegalitePy);
    }
}
