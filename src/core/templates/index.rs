//! In-memory index of scanned templates: backend → chart type → chart name.
//!
//! Keys are lowercased on the way in and on lookup. Iteration follows the
//! natural order: backends in declaration order, then chart types and chart
//! names lexicographically.

use std::collections::BTreeMap;

use super::{BackendKind, TemplateRecord};

/// Chart name → record
pub type NameBucket = BTreeMap<String, TemplateRecord>;
/// Chart type → chart names
pub type TypeBucket = BTreeMap<String, NameBucket>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateIndex {
    backends: BTreeMap<BackendKind, TypeBucket>,
}

impl TemplateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing and returning any record under the same key
    pub fn insert(
        &mut self,
        chart_type: &str,
        chart_name: &str,
        record: TemplateRecord,
    ) -> Option<TemplateRecord> {
        self.backends
            .entry(record.backend)
            .or_default()
            .entry(chart_type.to_lowercase())
            .or_default()
            .insert(chart_name.to_lowercase(), record)
    }

    pub fn get(
        &self,
        backend: BackendKind,
        chart_type: &str,
        chart_name: &str,
    ) -> Option<&TemplateRecord> {
        self.chart_names(backend, chart_type)?
            .get(&chart_name.to_lowercase())
    }

    /// Chart types registered for `backend`
    pub fn chart_types(&self, backend: BackendKind) -> Option<&TypeBucket> {
        self.backends.get(&backend)
    }

    /// Chart names registered for `backend` under `chart_type`
    pub fn chart_names(&self, backend: BackendKind, chart_type: &str) -> Option<&NameBucket> {
        self.chart_types(backend)?.get(&chart_type.to_lowercase())
    }

    /// Backends holding at least one template
    pub fn backends(&self) -> impl Iterator<Item = BackendKind> + '_ {
        self.backends.keys().copied()
    }

    /// Every record with its keys, in natural order
    pub fn records(&self) -> impl Iterator<Item = (&str, &str, &TemplateRecord)> + '_ {
        self.backends.values().flat_map(|types| {
            types.iter().flat_map(|(chart_type, names)| {
                names.iter().map(move |(chart_name, record)| {
                    (chart_type.as_str(), chart_name.as_str(), record)
                })
            })
        })
    }

    /// Number of indexed templates
    pub fn len(&self) -> usize {
        self.backends
            .values()
            .flat_map(|types| types.values())
            .map(|names| names.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human readable listing of the index, naming every backend
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for backend in BackendKind::all() {
            out.push_str(&format!("{backend}:\n"));
            let Some(types) = self.backends.get(&backend) else {
                continue;
            };
            for (chart_type, names) in types {
                out.push_str(&format!("  - {chart_type}:\n"));
                for chart_name in names.keys() {
                    out.push_str(&format!("    * {chart_name}\n"));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::templates::{TemplateHandle, extract_metadata};
    use std::path::PathBuf;

    fn record(backend: BackendKind, path: &str, chart_type: &str) -> TemplateRecord {
        let block = format!("REQUIREMENTS_BEGIN {{\"chart_type\": \"{chart_type}\"}} REQUIREMENTS_END");
        TemplateRecord {
            backend,
            handle: TemplateHandle::File(PathBuf::from(path)),
            requirements: extract_metadata(&block).unwrap(),
        }
    }

    #[test]
    fn test_insert_normalizes_keys() {
        let mut index = TemplateIndex::new();
        index.insert("Bar", "Basic_Bar", record(BackendKind::D3Js, "a.js", "Bar"));

        assert!(index.get(BackendKind::D3Js, "bar", "basic_bar").is_some());
        assert!(index.get(BackendKind::D3Js, "BAR", "BASIC_BAR").is_some());
        assert!(index.get(BackendKind::EchartsJs, "bar", "basic_bar").is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let mut index = TemplateIndex::new();
        assert!(index
            .insert("bar", "x", record(BackendKind::D3Js, "first.js", "bar"))
            .is_none());
        let replaced = index.insert("bar", "X", record(BackendKind::D3Js, "second.js", "bar"));

        assert_eq!(
            replaced.unwrap().handle,
            TemplateHandle::File(PathBuf::from("first.js"))
        );
        assert_eq!(
            index.get(BackendKind::D3Js, "bar", "x").unwrap().handle,
            TemplateHandle::File(PathBuf::from("second.js"))
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_records_follow_natural_order() {
        let mut index = TemplateIndex::new();
        index.insert("pie", "b", record(BackendKind::VegalitePy, "4", "pie"));
        index.insert("pie", "a", record(BackendKind::D3Js, "3", "pie"));
        index.insert("bar", "z", record(BackendKind::D3Js, "2", "bar"));
        index.insert("line", "a", record(BackendKind::EchartsPy, "1", "line"));

        let keys: Vec<_> = index
            .records()
            .map(|(t, n, r)| (r.backend, t.to_string(), n.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (BackendKind::EchartsPy, "line".into(), "a".into()),
                (BackendKind::D3Js, "bar".into(), "z".into()),
                (BackendKind::D3Js, "pie".into(), "a".into()),
                (BackendKind::VegalitePy, "pie".into(), "b".into()),
            ]
        );
        assert_eq!(
            index.backends().collect::<Vec<_>>(),
            vec![BackendKind::EchartsPy, BackendKind::D3Js, BackendKind::VegalitePy]
        );
    }

    #[test]
    fn test_empty() {
        let mut index = TemplateIndex::new();
        assert!(index.is_empty());
        index.insert("bar", "a", record(BackendKind::D3Js, "a.js", "bar"));
        assert!(!index.is_empty());
        assert!(index.chart_types(BackendKind::EchartsJs).is_none());
    }

    #[test]
    fn test_summary_lists_every_backend() {
        let mut index = TemplateIndex::new();
        index.insert("bar", "basic_bar", record(BackendKind::EchartsJs, "a.js", "bar"));
        index.insert("bar", "stacked_bar", record(BackendKind::EchartsJs, "b.js", "bar"));

        assert_eq!(
            index.summary(),
            "echarts_py:\n\
             echarts-js:\n  - bar:\n    * basic_bar\n    * stacked_bar\n\
             d3-js:\n\
             vegalite_py:\n"
        );
    }
}
