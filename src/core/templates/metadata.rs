//! Extraction of the metadata block embedded in chart template files.
//!
//! A template declares itself to the registry with a JSON object placed between
//! two literal markers, usually inside a block comment or docstring. Only
//! whitespace may separate the markers from the object:
//!
//! ```text
//! /*
//! REQUIREMENTS_BEGIN
//! { "chart_type": "bar", "chart_name": "stacked_bar", "min_series": 2 }
//! REQUIREMENTS_END
//! */
//! ```
//!
//! Only the first block in a file is considered.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Marker opening a metadata block
pub const METADATA_BEGIN: &str = "REQUIREMENTS_BEGIN";
/// Marker closing a metadata block
pub const METADATA_END: &str = "REQUIREMENTS_END";

static METADATA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?s){}\s*(\{{.*?\}})\s*{}",
        regex::escape(METADATA_BEGIN),
        regex::escape(METADATA_END)
    ))
    .expect("metadata pattern is a valid regex")
});

/// Why a file did not yield usable metadata
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No metadata block was found in the file
    #[error("no metadata block found")]
    Missing,

    /// The block parsed but has no string `chart_type` field
    #[error("metadata block has no chart_type")]
    MissingChartType,

    /// The block is not valid JSON
    #[error("invalid JSON in metadata block: {0}")]
    Parse(#[from] serde_json::Error),
}

impl MetadataError {
    /// Whether this outcome deserves a warning in the scan log.
    ///
    /// Missing blocks and fields are the normal case for helper files.
    pub fn is_reportable(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Parsed metadata of a single template file
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMetadata {
    /// Declared chart type, as written in the file
    pub chart_type: String,
    /// Declared chart name, if any
    pub chart_name: Option<String>,
    /// Every field of the block verbatim, including the two above
    pub fields: Map<String, JsonValue>,
}

impl TemplateMetadata {
    /// Look up an arbitrary metadata field
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    /// Lowercased chart type used as the index key
    pub fn chart_type_key(&self) -> String {
        self.chart_type.to_lowercase()
    }

    /// Lowercased chart name used as the index key, falling back to `file_stem`
    pub fn chart_name_key(&self, file_stem: &str) -> String {
        self.chart_name
            .as_deref()
            .unwrap_or(file_stem)
            .to_lowercase()
    }

    /// The metadata as a JSON object
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.fields.clone())
    }
}

impl TryFrom<Map<String, JsonValue>> for TemplateMetadata {
    type Error = MetadataError;

    fn try_from(fields: Map<String, JsonValue>) -> Result<Self, Self::Error> {
        let chart_type = fields
            .get("chart_type")
            .and_then(JsonValue::as_str)
            .ok_or(MetadataError::MissingChartType)?
            .to_string();
        let chart_name = fields
            .get("chart_name")
            .and_then(JsonValue::as_str)
            .map(str::to_string);

        Ok(Self {
            chart_type,
            chart_name,
            fields,
        })
    }
}

/// Locate the raw text of the metadata object in `content`
pub fn find_metadata_block(content: &str) -> Option<&str> {
    METADATA_PATTERN
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract and parse the metadata block of a template file
pub fn extract_metadata(content: &str) -> Result<TemplateMetadata, MetadataError> {
    let block = find_metadata_block(content).ok_or(MetadataError::Missing)?;
    let fields: Map<String, JsonValue> = serde_json::from_str(block)?;
    TemplateMetadata::try_from(fields)
}
