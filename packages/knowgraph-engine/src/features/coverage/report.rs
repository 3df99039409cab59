use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::features::graph_builder::application::fqn;
use crate::features::graph_builder::ResolvedRecord;
use crate::features::scanning::ScannedFile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub file: String,
    pub symbols: usize,
    pub annotated: usize,
    /// Fully qualified names of symbols without an annotation, sorted
    pub unannotated: Vec<String>,
}

impl FileCoverage {
    /// `None` for files without a symbol table
    pub fn from_scan(file: &ScannedFile, records: &[ResolvedRecord]) -> Option<Self> {
        if file.symbols.is_empty() {
            return None;
        }
        let annotated: BTreeSet<&str> = records.iter().map(|r| r.qualified_name.as_str()).collect();

        let missing: Vec<&str> = file
            .symbols
            .iter()
            .map(|s| s.qualified_name.as_str())
            .filter(|q| !annotated.contains(q))
            .collect();

        let mut unannotated: Vec<String> = missing
            .iter()
            .map(|q| fqn(&file.module_path, q))
            .collect();
        unannotated.sort();
        unannotated.dedup();

        Some(Self {
            file: file.file_path.clone(),
            symbols: file.symbols.len(),
            annotated: file.symbols.len() - missing.len(),
            unannotated,
        })
    }

    pub fn ratio(&self) -> f64 {
        ratio(self.annotated, self.symbols)
    }
}

/// Coverage across all scanned files, ordered by file path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub files: Vec<FileCoverage>,
    pub total_symbols: usize,
    pub annotated_symbols: usize,
}

impl CoverageReport {
    pub fn from_files(files: impl IntoIterator<Item = FileCoverage>) -> Self {
        let mut files: Vec<FileCoverage> = files.into_iter().collect();
        files.sort_by(|a, b| a.file.cmp(&b.file));
        Self {
            total_symbols: files.iter().map(|f| f.symbols).sum(),
            annotated_symbols: files.iter().map(|f| f.annotated).sum(),
            files,
        }
    }

    /// Annotated share of all symbols; 1.0 when there is nothing to annotate
    pub fn ratio(&self) -> f64 {
        ratio(self.annotated_symbols, self.total_symbols)
    }

    pub fn file(&self, path: &str) -> Option<&FileCoverage> {
        self.files.iter().find(|f| f.file == path)
    }

    /// Every unannotated symbol across files
    pub fn unannotated(&self) -> impl Iterator<Item = &str> {
        self.files.iter().flat_map(|f| f.unannotated.iter().map(String::as_str))
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        1.0
    } else {
        part as f64 / whole as f64
    }
}
