//! Extraction infrastructure

mod extractor;
mod leader;

pub use extractor::AnnotationExtractor;
pub use leader::{split_leader, Leader};
