//! Schema domain models

mod meta_value;
mod record;

pub use meta_value::MetaValue;
pub use record::{
    AnnotationRecord, Compliance, Context, DataSensitivity, Dependencies, FunnelStage, Link,
    Operational, RevenueImpact, Status,
};
