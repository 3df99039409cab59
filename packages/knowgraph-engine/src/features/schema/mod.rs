//! Schema Validator & Normalizer
//!
//! Parses an annotation body into a [`MetaValue`] tree, then validates it
//! field by field into a typed [`AnnotationRecord`].
//!
//! ## Structure
//! - `domain/` - MetaValue, AnnotationRecord and its enumerations
//! - `application/` - SchemaValidator (parse → convert → validate)

pub mod application;
pub mod domain;

pub use application::SchemaValidator;
pub use domain::{
    AnnotationRecord, Compliance, Context, DataSensitivity, Dependencies, FunnelStage, Link,
    MetaValue, Operational, RevenueImpact, Status,
};
