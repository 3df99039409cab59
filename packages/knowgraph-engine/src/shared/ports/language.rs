//! Language abstraction

use serde::{Deserialize, Serialize};

/// Languages with a structured (tree-sitter) adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    Python,
    Java,
    Go,
    TypeScript,
    Rust,
}

impl LanguageId {
    pub const ALL: [LanguageId; 5] = [
        LanguageId::Python,
        LanguageId::Java,
        LanguageId::Go,
        LanguageId::TypeScript,
        LanguageId::Rust,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LanguageId::Python => "python",
            LanguageId::Java => "java",
            LanguageId::Go => "go",
            LanguageId::TypeScript => "typescript",
            LanguageId::Rust => "rust",
        }
    }

    /// JavaScript files go through the TypeScript grammar
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            LanguageId::Python => &["py", "pyi"],
            LanguageId::Java => &["java"],
            LanguageId::Go => &["go"],
            LanguageId::TypeScript => &["ts", "tsx", "js", "jsx", "mjs", "cjs"],
            LanguageId::Rust => &["rs"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Some(LanguageId::Python),
            "java" => Some(LanguageId::Java),
            "go" => Some(LanguageId::Go),
            "ts" | "tsx" | "js" | "jsx" | "mjs" | "cjs" => Some(LanguageId::TypeScript),
            "rs" => Some(LanguageId::Rust),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.name() == name)
    }

    pub fn from_file_path(path: &str) -> Option<Self> {
        extension_of(path).and_then(Self::from_extension)
    }
}

/// Extension of the last path component, if it has one
pub fn extension_of(path: &str) -> Option<&str> {
    let file_name = path.rsplit(['/', '\\']).next()?;
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() {
        None
    } else {
        Some(ext)
    }
}
