// Graph Builder Application Layer
//
// Per-file resolution of raw annotations to entity identities.

mod resolver;

pub use resolver::{EntityResolver, ResolvedRecord};
pub(crate) use resolver::fqn;
