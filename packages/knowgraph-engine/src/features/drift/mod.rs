//! Drift detection between two graph snapshots
//!
//! Nodes are matched by identity. A node present in both snapshots is
//! `changed` when any leaf of its merged record differs; line shifts and
//! provenance alone do not count as drift.

pub mod application;
pub mod domain;

pub use application::diff;
pub use domain::{GraphDiff, NodeChange};
