//! Scan inputs
//!
//! Either files on disk (a walked root or an explicit list) or in-memory
//! contents. Paths are normalized to `/` separators and, for walked roots,
//! made relative to the root; these labels feed entity identities.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::Result;
use crate::features::scanning::AdapterRegistry;
use crate::shared::utils::id_generator::normalize_path;

/// Directories never descended into
const SKIP_DIRS: &[&str] = &[".git", "target", "node_modules", "__pycache__", ".venv"];

/// File content supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: normalize_path(&path.into()),
            content: content.into(),
        }
    }
}

/// Files to read from disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    root: Option<PathBuf>,
    paths: Vec<String>,
}

impl SourceSet {
    /// Walk `root`, keeping files some registered adapter accepts
    pub fn from_root(root: impl AsRef<Path>, registry: &AdapterRegistry) -> Result<Self> {
        let root = root.as_ref();
        let mut paths = Vec::new();

        let walker = WalkDir::new(root).follow_links(false).into_iter().filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && SKIP_DIRS.contains(&e.file_name().to_string_lossy().as_ref()))
        });

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let label = normalize_path(&relative.to_string_lossy());
            if registry.adapter_for(&label).is_some() {
                paths.push(label);
            }
        }
        paths.sort();

        tracing::debug!(root = %root.display(), files = paths.len(), "Collected sources");
        Ok(Self {
            root: Some(root.to_path_buf()),
            paths,
        })
    }

    /// Explicit file list; labels are normalized, sorted and deduplicated
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut paths: Vec<String> = paths
            .into_iter()
            .map(|p| normalize_path(&p.as_ref().to_string_lossy()))
            .collect();
        paths.sort();
        paths.dedup();
        Self { root: None, paths }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Path labels, sorted
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// On-disk location of a label
    pub fn resolve(&self, label: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(label),
            None => PathBuf::from(label),
        }
    }
}
