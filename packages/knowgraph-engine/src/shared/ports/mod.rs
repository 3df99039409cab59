//! Shared ports

pub mod language;

pub use language::{extension_of, LanguageId};
