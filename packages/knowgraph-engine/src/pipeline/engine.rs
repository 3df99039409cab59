//! Scan engine
//!
//! A pure function of (file set, file contents) → (graph, diagnostics).
//! The engine holds no per-scan state, so one instance can run any number
//! of scans, concurrently or in sequence.

use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::errors::{EngineError, Result};
use crate::features::coverage::{CoverageReport, FileCoverage};
use crate::features::extraction::{AnnotationExtractor, SentinelRegistry};
use crate::features::graph_builder::{EntityResolver, GraphBuilder};
use crate::features::scanning::{create_registry, AdapterRegistry};
use crate::features::schema::SchemaValidator;
use crate::pipeline::cancellation::CancellationFlag;
use crate::pipeline::result::ScanOutcome;
use crate::pipeline::sources::{SourceFile, SourceSet};
use crate::shared::models::{Diagnostic, Diagnostics};

/// One unit of per-file work
enum Input<'a> {
    Disk { label: &'a str, set: &'a SourceSet },
    Memory(&'a SourceFile),
}

impl Input<'_> {
    fn label(&self) -> &str {
        match self {
            Input::Disk { label, .. } => label,
            Input::Memory(source) => &source.path,
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    registry: AdapterRegistry,
    extractor: AnnotationExtractor,
    resolver: EntityResolver,
}

impl Engine {
    /// Engine with the default configuration
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self {
            registry: create_registry(&crate::shared::LanguageId::ALL, config.fallback),
            extractor: AnnotationExtractor::default(),
            resolver: EntityResolver::new(SchemaValidator::new()),
            config,
        }
    }

    /// Engine for a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let sentinels = SentinelRegistry::from_config(&config)?;
        let languages = config.enabled_languages()?;
        Ok(Self {
            registry: create_registry(&languages, config.fallback),
            extractor: AnnotationExtractor::new(sentinels),
            resolver: EntityResolver::new(SchemaValidator::new()),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Scan an explicit list of files
    pub fn scan<I, P>(&self, files: I) -> Result<ScanOutcome>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.scan_set(&SourceSet::from_paths(files), &CancellationFlag::new())
    }

    /// Walk `root` and scan every file an adapter accepts
    pub fn scan_root(&self, root: impl AsRef<Path>) -> Result<ScanOutcome> {
        let set = SourceSet::from_root(root, &self.registry)?;
        self.scan_set(&set, &CancellationFlag::new())
    }

    /// Scan contents already in memory
    pub fn scan_sources(&self, sources: &[SourceFile]) -> Result<ScanOutcome> {
        let mut seen = HashSet::new();
        let inputs: Vec<Input> = sources
            .iter()
            .filter(|source| {
                let first = seen.insert(source.path.as_str());
                if !first {
                    tracing::debug!(file = %source.path, "Duplicate source; keeping the first");
                }
                first
            })
            .map(Input::Memory)
            .collect();
        self.run(&inputs, &CancellationFlag::new())
    }

    /// Scan a source set; returns `EngineError::Cancelled` once `cancel` is set
    pub fn scan_set(&self, set: &SourceSet, cancel: &CancellationFlag) -> Result<ScanOutcome> {
        let inputs: Vec<Input> = set
            .paths()
            .iter()
            .map(|label| Input::Disk { label, set })
            .collect();
        self.run(&inputs, cancel)
    }

    fn run(&self, inputs: &[Input], cancel: &CancellationFlag) -> Result<ScanOutcome> {
        let start = Instant::now();
        let builder = GraphBuilder::new();
        let diagnostics = Mutex::new(Diagnostics::new());
        let coverage = Mutex::new(Vec::new());
        let scanned = Mutex::new(0usize);

        let process = || {
            inputs.par_iter().for_each(|input| {
                if cancel.is_cancelled() {
                    return;
                }
                let mut local = Diagnostics::new();
                if let Some(file_coverage) = self.process_file(input, &builder, &mut local) {
                    *scanned.lock() += 1;
                    coverage.lock().extend(file_coverage);
                }
                if !local.is_empty() {
                    diagnostics.lock().extend(local);
                }
            })
        };

        if self.config.parallel.workers == 0 {
            process();
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.parallel.effective_workers())
                .build()?;
            pool.install(process);
        }

        if cancel.is_cancelled() {
            tracing::info!(files = inputs.len(), "Scan cancelled; partial graph discarded");
            return Err(EngineError::Cancelled);
        }

        let graph = builder.finish();
        let mut diagnostics = diagnostics.into_inner();
        diagnostics.sort();
        let outcome = ScanOutcome {
            graph,
            diagnostics,
            coverage: CoverageReport::from_files(coverage.into_inner()),
            files_scanned: scanned.into_inner(),
        };

        tracing::info!(
            files = outcome.files_scanned,
            nodes = outcome.graph.node_count(),
            edges = outcome.graph.edge_count(),
            diagnostics = outcome.diagnostics.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan complete"
        );
        Ok(outcome)
    }

    /// Scan one file into the builder.
    ///
    /// Returns `None` when the file was skipped (unreadable or unsupported),
    /// otherwise its coverage entry (itself `None` for files without symbols).
    fn process_file(
        &self,
        input: &Input,
        builder: &GraphBuilder,
        diagnostics: &mut Diagnostics,
    ) -> Option<Option<FileCoverage>> {
        let label = input.label();
        let Some(adapter) = self.registry.adapter_for(label) else {
            tracing::debug!(file = %label, "No adapter; skipping");
            return None;
        };

        let owned;
        let content: &str = match input {
            Input::Memory(source) => &source.content,
            Input::Disk { set, .. } => match std::fs::read(set.resolve(label)) {
                Ok(bytes) => {
                    owned = String::from_utf8(bytes).unwrap_or_else(|e| {
                        tracing::warn!(file = %label, error = %e.utf8_error(), "Invalid UTF-8; bytes replaced");
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    });
                    &owned
                }
                Err(e) => {
                    diagnostics.push(Diagnostic::io(label, format!("cannot read file: {}", e)));
                    return None;
                }
            },
        };

        let file = adapter.locate(label, content);
        let raws = self.extractor.extract_file(&file, diagnostics);
        tracing::debug!(
            file = %label,
            adapter = adapter.name(),
            spans = file.span_count(),
            annotations = raws.len(),
            "Located annotations"
        );

        let records = if raws.is_empty() {
            Vec::new()
        } else {
            self.resolver.resolve_file(&file, raws, diagnostics)
        };
        let file_coverage = FileCoverage::from_scan(&file, &records);
        builder.insert_all(records);
        Some(file_coverage)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::DiagnosticKind;

    const ORDERS: &str = r#""""
@knowgraph
type: module
description: Order endpoints
owner: orders-team
"""


def create_order():
    """
    @knowgraph
    type: function
    description: Create an order
    dependencies:
      services: [payment-service]
    """
"#;

    #[test]
    fn test_scan_sources_builds_graph() {
        let outcome = Engine::new()
            .scan_sources(&[SourceFile::new("orders.py", ORDERS)])
            .unwrap();
        assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
        assert_eq!(outcome.files_scanned, 1);
        assert_eq!(outcome.graph.node_count(), 2);
        // contains + depends_on_service
        assert_eq!(outcome.graph.edge_count(), 2);
        assert!(outcome.graph.node_by_fqn("orders.create_order").is_some());
    }

    #[test]
    fn test_missing_file_is_io_diagnostic() {
        let outcome = Engine::new().scan(["does/not/exist.py"]).unwrap();
        let kinds: Vec<_> = outcome.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::IoError]);
        assert_eq!(outcome.files_scanned, 0);
        assert!(outcome.graph.is_empty());
    }

    #[test]
    fn test_cancelled_scan_returns_error() {
        let engine = Engine::new();
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let set = SourceSet::from_paths(["a.py"]);
        assert!(matches!(engine.scan_set(&set, &cancel), Err(EngineError::Cancelled)));
    }

    #[test]
    fn test_disabled_fallback_skips_unknown_extensions() {
        let mut config = EngineConfig::default();
        config.fallback = false;
        config.parallel.workers = 2;
        let engine = Engine::with_config(config).unwrap();
        let outcome = engine
            .scan_sources(&[SourceFile::new("notes.txt", "@knowgraph\ntype: module\ndescription: x\n")])
            .unwrap();
        assert_eq!(outcome.files_scanned, 0);
        assert!(outcome.graph.is_empty());
    }

    #[test]
    fn test_duplicate_sources_are_scanned_once() {
        let engine = Engine::new();
        let once = engine.scan_sources(&[SourceFile::new("orders.py", ORDERS)]).unwrap();
        let twice = engine
            .scan_sources(&[
                SourceFile::new("orders.py", ORDERS),
                SourceFile::new("./orders.py", ORDERS),
            ])
            .unwrap();

        assert_eq!(twice.files_scanned, 1);
        let node = twice.graph.node_by_fqn("orders.create_order").unwrap();
        assert_eq!(node.provenance.len(), 1);
        assert_eq!(
            once.graph.to_json_pretty().unwrap(),
            twice.graph.to_json_pretty().unwrap()
        );
    }

    #[test]
    fn test_duplicate_paths_on_disk_are_scanned_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("orders.py");
        std::fs::write(&path, ORDERS).unwrap();
        let dotted = dir.path().join(".").join("orders.py");

        let once = Engine::new().scan([&path]).unwrap();
        let twice = Engine::new().scan([&path, &dotted, &path]).unwrap();

        assert_eq!(twice.files_scanned, 1);
        assert_eq!(
            once.graph.to_json_pretty().unwrap(),
            twice.graph.to_json_pretty().unwrap()
        );
    }

    #[test]
    fn test_non_utf8_bytes_keep_annotations() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("orders.py");
        // Latin-1 'é' in an unrelated comment
        let mut bytes = b"# caf\xe9 notes\n".to_vec();
        bytes.extend_from_slice(ORDERS.as_bytes());
        std::fs::write(&path, bytes).unwrap();

        let outcome = Engine::new().scan([&path]).unwrap();
        assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
        assert_eq!(outcome.files_scanned, 1);
        assert_eq!(outcome.graph.node_count(), 2);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.languages.push("cobol".into());
        assert!(matches!(Engine::with_config(config), Err(EngineError::Config(_))));
    }
}
