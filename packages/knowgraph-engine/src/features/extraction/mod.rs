//! Annotation Extractor
//!
//! Finds registered sentinel markers inside comment/docstring spans and
//! isolates the structured-text body that follows each one.
//!
//! ## Structure
//! - `domain/` - Sentinel registry, RawAnnotation
//! - `infrastructure/` - Comment-leader stripping, fencing and body normalisation

pub mod domain;
pub mod infrastructure;

pub use domain::{RawAnnotation, Sentinel, SentinelRegistry};
pub use infrastructure::AnnotationExtractor;
