//! Feature slices, one per pipeline stage
//!
//! scanning → extraction → schema → graph_builder, plus drift (snapshot
//! diffing) and coverage (annotated vs. unannotated symbols).

pub mod coverage;
pub mod drift;
pub mod extraction;
pub mod graph_builder;
pub mod scanning;
pub mod schema;
