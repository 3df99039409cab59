// Graph Builder Infrastructure
//
// Concurrent accumulation of resolved records and final graph assembly.

mod builder;

pub use builder::GraphBuilder;
