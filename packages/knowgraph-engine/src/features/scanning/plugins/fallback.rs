//! Fallback adapter for files no language plugin claims

use crate::features::scanning::domain::ScannedFile;
use crate::features::scanning::ports::LanguageAdapter;
use crate::shared::ports::LanguageId;
use crate::shared::utils::module_path_for;

/// Treats the whole file as one module-level span with no symbols
#[derive(Debug, Default)]
pub struct FallbackAdapter;

impl FallbackAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageAdapter for FallbackAdapter {
    fn language_id(&self) -> Option<LanguageId> {
        None
    }

    fn supports(&self, _ext: &str) -> bool {
        true
    }

    fn locate(&self, file_path: &str, source: &str) -> ScannedFile {
        ScannedFile::unstructured(file_path, module_path_for(file_path), None, source)
    }
}
