//! Tree-sitter parser implementation

use tree_sitter::{Language as TSLanguage, Parser as TSParser, Tree};

use crate::features::scanning::domain::ScannedFile;
use crate::features::scanning::infrastructure::TreeWalker;
use crate::features::scanning::ports::{LanguageAdapter, SyntaxHooks};
use crate::shared::ports::LanguageId;
use crate::shared::utils::module_path_for;

/// Parse `source` with the given grammar.
///
/// Returns `None` if the grammar cannot be loaded (ABI mismatch). Syntax
/// errors never fail the parse; they surface as error nodes in the tree.
pub fn parse_source(language: &TSLanguage, source: &str) -> Option<Tree> {
    let mut parser = TSParser::new();
    if let Err(e) = parser.set_language(language) {
        tracing::warn!(error = %e, "Failed to load tree-sitter grammar");
        return None;
    }
    parser.parse(source, None)
}

/// [`LanguageAdapter`] backed by tree-sitter and the shared tree walker
pub struct TreeSitterAdapter<H: SyntaxHooks> {
    hooks: H,
}

impl<H: SyntaxHooks> TreeSitterAdapter<H> {
    pub fn new(hooks: H) -> Self {
        Self { hooks }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }
}

impl<H: SyntaxHooks> LanguageAdapter for TreeSitterAdapter<H> {
    fn language_id(&self) -> Option<LanguageId> {
        Some(self.hooks.language_id())
    }

    fn locate(&self, file_path: &str, source: &str) -> ScannedFile {
        let module_path = module_path_for(file_path);
        let language = self.hooks.language_id();

        let grammar = self.hooks.tree_sitter_language_for(file_path);
        let Some(tree) = parse_source(&grammar, source) else {
            tracing::warn!(
                file = file_path,
                language = language.name(),
                "Parse failed, scanning file as unstructured text"
            );
            return ScannedFile::unstructured(file_path, module_path, Some(language), source);
        };

        let root = tree.root_node();
        let has_errors = root.has_error();
        if has_errors {
            tracing::debug!(file = file_path, "Syntax errors present, walking best-effort");
        }

        let (symbols, spans) = TreeWalker::new(&self.hooks, source, file_path).walk(root, &module_path);
        tracing::trace!(
            file = file_path,
            symbols = symbols.len(),
            spans = spans.len(),
            "Located comment spans"
        );

        ScannedFile::new(file_path, module_path, Some(language), symbols, spans)
            .with_syntax_errors(has_errors)
    }
}
