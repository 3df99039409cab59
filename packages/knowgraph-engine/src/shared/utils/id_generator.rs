//! ID generation utilities
//!
//! Generates stable, deterministic IDs for entities using SHA-256. Identities
//! depend only on (file path, qualified name, kind) so two scans of the same
//! tree always agree, whatever order the files were processed in.

use sha2::{Digest, Sha256};

use crate::shared::models::SymbolKind;

/// Length of generated IDs in hex characters
pub const ID_LEN: usize = 32;

/// ID Generator for creating stable entity IDs
pub struct IdGenerator;

impl IdGenerator {
    /// Generate an entity ID
    ///
    /// Format: first 32 hex chars of sha256(file_path \0 qualified_name \0 kind)
    pub fn entity_id(file_path: &str, qualified_name: &str, kind: SymbolKind) -> String {
        Self::hash_to_hex(&[file_path, qualified_name, kind.as_str()])
    }

    /// Generate an edge ID
    pub fn edge_id(source_id: &str, kind: &str, target: &str) -> String {
        Self::hash_to_hex(&[source_id, kind, target])
    }

    fn hash_to_hex(parts: &[&str]) -> String {
        let mut hasher = Sha256::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                hasher.update([0u8]);
            }
            hasher.update(part.as_bytes());
        }
        let digest = hasher.finalize();
        let mut hex = String::with_capacity(ID_LEN);
        for byte in digest.iter().take(ID_LEN / 2) {
            hex.push_str(&format!("{:02x}", byte));
        }
        hex
    }
}

/// Normalize a path for use in identities: forward slashes, no `.` or
/// empty segments
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let joined = unified
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/");
    if unified.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Module path for a file: path components without the extension, joined by `.`
///
/// `routers/orders.py` → `routers.orders`
pub fn module_path_for(file_path: &str) -> String {
    let normalized = normalize_path(file_path);
    let without_ext = match normalized.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') && !stem.is_empty() && !stem.ends_with('/') => {
            stem.to_string()
        }
        _ => normalized.clone(),
    };
    without_ext
        .split('/')
        .filter(|part| !part.is_empty() && *part != "..")
        .collect::<Vec<_>>()
        .join(".")
}
