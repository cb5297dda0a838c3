//! Template registry service: owns the index and answers lookups.
//!
//! # Lifecycle
//!
//! The owning service calls [`TemplateRegistry::initialize`] once before the
//! first request. Lookups made before that still trigger the first scan.
//! [`TemplateRegistry::scan`] with `force` rebuilds the index from disk.
//!
//! # Concurrency
//!
//! The index is an immutable snapshot behind an `RwLock<Option<Arc<_>>>`.
//! Scans are serialized by a separate mutex and build the replacement index
//! without holding the read lock, so readers always observe either the old or
//! the new index in full.
//!
//! # Resolution
//!
//! By type: an exact key match in the first preferred backend that has one,
//! otherwise the first registered type (in preference order) that contains or
//! is contained in the request. Among the chart names of the chosen type one
//! is picked by the injected [`VariantPicker`].
//!
//! By name: an exact name match in natural index order, otherwise the name
//! sharing the most distinct characters with the request.

// Internal imports (std, crate)
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::core::config::RegistryConfig;

use super::{
    BackendKind, NameBucket, RandomPicker, RenderableRegistry, ResolvedTemplate, TemplateIndex,
    TemplateScanner, VariantPicker,
};

// External imports (alphabetized)
use tracing::{debug, info};

pub struct TemplateRegistry {
    config: RegistryConfig,
    scanner: TemplateScanner,
    index: RwLock<Option<Arc<TemplateIndex>>>,
    scan_lock: Mutex<()>,
    picker: Mutex<Box<dyn VariantPicker>>,
}

impl TemplateRegistry {
    /// Create a registry choosing variants uniformly at random
    pub fn new(config: RegistryConfig, renderables: RenderableRegistry) -> Self {
        Self::with_picker(config, renderables, RandomPicker::new())
    }

    /// Create a registry with an explicit variant picker
    pub fn with_picker<P>(config: RegistryConfig, renderables: RenderableRegistry, picker: P) -> Self
    where
        P: VariantPicker + 'static,
    {
        let scanner = TemplateScanner::new(config.backends.clone(), Arc::new(renderables));
        Self {
            config,
            scanner,
            index: RwLock::new(None),
            scan_lock: Mutex::new(()),
            picker: Mutex::new(Box::new(picker)),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Whether a scan has completed
    pub fn is_initialized(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Perform the first scan if none has happened yet
    pub fn initialize(&self) -> Arc<TemplateIndex> {
        self.scan(false)
    }

    /// Scan the backend roots.
    ///
    /// Without `force` an existing index is returned untouched.
    pub fn scan(&self, force: bool) -> Arc<TemplateIndex> {
        if !force {
            if let Some(index) = self.snapshot() {
                return index;
            }
        }

        let _guard = self.scan_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !force {
            // Another caller may have finished the first scan while we waited.
            if let Some(index) = self.snapshot() {
                return index;
            }
        }

        info!(
            templates_root = %self.config.templates_root.display(),
            force,
            "Scanning chart templates"
        );
        let index = Arc::new(self.scanner.scan());
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&index));
        index
    }

    /// The current index, scanning first if necessary
    pub fn index(&self) -> Arc<TemplateIndex> {
        self.initialize()
    }

    /// Find a template for `chart_type`.
    ///
    /// `preference` defaults to the configured backend order.
    pub fn resolve_by_type(
        &self,
        chart_type: &str,
        preference: Option<&[BackendKind]>,
    ) -> Option<ResolvedTemplate> {
        let index = self.index();
        let chart_type = chart_type.to_lowercase();
        let preference = preference.unwrap_or(self.config.preference.as_slice());

        for &backend in preference {
            if let Some(names) = index.chart_names(backend, &chart_type) {
                if let Some(resolved) = self.pick_variant(&chart_type, names) {
                    debug!(
                        %backend,
                        chart_type = %chart_type,
                        chart_name = %resolved.chart_name,
                        "Exact chart type match"
                    );
                    return Some(resolved);
                }
            }
        }

        for &backend in preference {
            let Some(types) = index.chart_types(backend) else {
                continue;
            };
            for (registered, names) in types {
                if !(registered.contains(&chart_type) || chart_type.contains(registered.as_str())) {
                    continue;
                }
                if let Some(resolved) = self.pick_variant(registered, names) {
                    debug!(
                        %backend,
                        requested = %chart_type,
                        chart_type = %registered,
                        chart_name = %resolved.chart_name,
                        "Partial chart type match"
                    );
                    return Some(resolved);
                }
            }
        }

        debug!(chart_type = %chart_type, "No template for chart type");
        None
    }

    /// Find the template registered as `chart_name`, or the closest name
    pub fn resolve_by_name(&self, chart_name: &str) -> Option<ResolvedTemplate> {
        let index = self.index();
        let chart_name = chart_name.to_lowercase();

        if let Some((chart_type, name, record)) =
            index.records().find(|(_, name, _)| *name == chart_name)
        {
            debug!(backend = %record.backend, chart_name = %name, "Exact chart name match");
            return Some(ResolvedTemplate::from_record(chart_type, name, record));
        }

        let mut best = None;
        let mut max_overlap = 0;
        for (chart_type, name, record) in index.records() {
            let overlap = character_overlap(&chart_name, name);
            if overlap > max_overlap {
                max_overlap = overlap;
                best = Some((chart_type, name, record));
            }
        }

        match best {
            Some((chart_type, name, record)) => {
                debug!(
                    requested = %chart_name,
                    chart_name = %name,
                    overlap = max_overlap,
                    "Closest chart name match"
                );
                Some(ResolvedTemplate::from_record(chart_type, name, record))
            }
            None => {
                debug!(chart_name = %chart_name, "No template for chart name");
                None
            }
        }
    }

    fn snapshot(&self) -> Option<Arc<TemplateIndex>> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn pick_variant(&self, chart_type: &str, names: &NameBucket) -> Option<ResolvedTemplate> {
        if names.is_empty() {
            return None;
        }
        let choice = self
            .picker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pick(names.len());
        let (chart_name, record) = names.iter().nth(choice.min(names.len() - 1))?;
        Some(ResolvedTemplate::from_record(chart_type, chart_name, record))
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Number of distinct characters `a` and `b` have in common
pub fn character_overlap(a: &str, b: &str) -> usize {
    let a: HashSet<char> = a.chars().collect();
    let b: HashSet<char> = b.chars().collect();
    a.intersection(&b).count()
}
