//! Scan pipeline
//!
//! One task per input file on a rayon pool: read → locate spans → extract
//! → validate/resolve → buffer records per identity. The graph is merged
//! once every file is done.

pub mod cancellation;
pub mod engine;
pub mod result;
pub mod sources;

pub use cancellation::CancellationFlag;
pub use engine::Engine;
pub use result::ScanOutcome;
pub use sources::{SourceFile, SourceSet};
