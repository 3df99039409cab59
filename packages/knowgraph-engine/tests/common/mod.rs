//! Common test utilities for knowgraph-engine
//!
//! Fixture loading and graph assertions shared by the integration tests.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
