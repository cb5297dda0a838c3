//! Filesystem scan that builds a [`TemplateIndex`] from the backend roots.
//!
//! A scan never fails as a whole. Missing roots contribute nothing, and a file
//! that cannot be read, parsed or loaded is skipped; only genuinely broken
//! files (invalid metadata JSON, unreadable text, failed loads) are logged as
//! warnings. Symlinked directories are followed.
//!
//! A code-backed file with no factory in the [`RenderableRegistry`] is indexed
//! as a file reference.

// Internal imports (std, crate)
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::{
    BackendRoot, LoadRequest, RenderableRegistry, TemplateHandle, TemplateIndex, TemplateMetadata,
    TemplateRecord, extract_metadata,
};

// External imports (alphabetized)
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File name prefix of package-init modules in Python backends
pub const INIT_FILE_PREFIX: &str = "__";

/// Walks backend roots and indexes the templates found there
#[derive(Debug, Clone)]
pub struct TemplateScanner {
    roots: Vec<BackendRoot>,
    renderables: Arc<RenderableRegistry>,
}

impl TemplateScanner {
    pub fn new(roots: Vec<BackendRoot>, renderables: Arc<RenderableRegistry>) -> Self {
        Self { roots, renderables }
    }

    /// Build a fresh index from every backend root
    pub fn scan(&self) -> TemplateIndex {
        let mut index = TemplateIndex::new();
        for root in &self.roots {
            let registered = self.scan_backend(root, &mut index);
            debug!(
                backend = %root.backend,
                root = %root.root.display(),
                registered,
                "Scanned backend root"
            );
        }
        info!(templates = index.len(), "Template scan complete");
        index
    }

    /// Scan one backend root into `index`, returning how many files registered
    pub fn scan_backend(&self, root: &BackendRoot, index: &mut TemplateIndex) -> usize {
        if !root.root.is_dir() {
            debug!(
                backend = %root.backend,
                root = %root.root.display(),
                "Backend root not found, skipping"
            );
            return 0;
        }

        WalkDir::new(&root.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter(|entry| self.register_file(root, entry.path(), index))
            .count()
    }

    fn register_file(&self, root: &BackendRoot, path: &Path, index: &mut TemplateIndex) -> bool {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        if !has_extension(file_name, &root.extension) {
            return false;
        }
        if root.backend.skips_init_files() && file_name.starts_with(INIT_FILE_PREFIX) {
            return false;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read template file");
                return false;
            }
        };

        let metadata = match extract_metadata(&content) {
            Ok(metadata) => metadata,
            Err(e) => {
                if e.is_reportable() {
                    warn!(path = %path.display(), error = %e, "Invalid metadata in template file");
                }
                return false;
            }
        };

        let chart_type = metadata.chart_type_key();
        let chart_name = metadata.chart_name_key(file_stem(file_name));

        let Some(handle) = self.load_handle(root, path, &metadata) else {
            return false;
        };

        let record = TemplateRecord {
            backend: root.backend,
            handle,
            requirements: metadata,
        };
        if let Some(previous) = index.insert(&chart_type, &chart_name, record) {
            debug!(
                backend = %root.backend,
                chart_type = %chart_type,
                chart_name = %chart_name,
                replaced = %previous.handle.path().display(),
                "Duplicate template key, keeping the later file"
            );
        }
        debug!(
            backend = %root.backend,
            chart_type = %chart_type,
            chart_name = %chart_name,
            path = %path.display(),
            "Registered template"
        );
        true
    }

    fn load_handle(
        &self,
        root: &BackendRoot,
        path: &Path,
        metadata: &TemplateMetadata,
    ) -> Option<TemplateHandle> {
        if !root.backend.is_code_backed() {
            return Some(TemplateHandle::File(path.to_path_buf()));
        }
        if !self.renderables.can_load(path) {
            debug!(
                path = %path.display(),
                "No renderable factory, indexing code-backed template as file"
            );
            return Some(TemplateHandle::File(path.to_path_buf()));
        }

        let request = LoadRequest {
            backend: root.backend,
            path,
            metadata,
        };
        match self.renderables.load(&request) {
            Ok(unit) => Some(TemplateHandle::Loaded {
                path: path.to_path_buf(),
                unit,
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load code-backed template");
                None
            }
        }
    }
}

fn has_extension(file_name: &str, extension: &str) -> bool {
    file_name
        .strip_suffix(extension)
        .is_some_and(|rest| rest.ends_with('.'))
}

/// File name up to its first dot
fn file_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}
