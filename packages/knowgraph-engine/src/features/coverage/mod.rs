//! Annotation coverage
//!
//! Which symbols of each scanned file carry a valid annotation. Files
//! without a symbol table (fallback adapter) have nothing to cover and are
//! left out.

mod report;

pub use report::{CoverageReport, FileCoverage};
