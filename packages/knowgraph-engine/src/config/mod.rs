//! Engine configuration
//!
//! Configuration is a versioned YAML document (`version: 1`). Every field
//! has a default, so an empty engine needs no file at all:
//!
//! ```yaml
//! version: 1
//! sentinels:
//!   - { token: "@codegraph", variant: codegraph, rank: 0 }
//!   - { token: "@knowgraph", variant: knowgraph, rank: 1 }
//!   - { token: "knowgraph:", variant: knowgraph, rank: 1 }
//! languages: [python, java, go, typescript, rust]
//! fallback: true
//! parallel:
//!   workers: 0
//! ```

pub mod engine_config;
pub mod error;

pub use engine_config::{EngineConfig, ParallelConfig, SentinelConfig, CONFIG_VERSION};
pub use error::{ConfigError, ConfigResult};
