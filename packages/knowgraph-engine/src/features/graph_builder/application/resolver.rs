// Entity Resolver
//
// Turns the raw annotations of one file into identity-keyed records:
//   1. validate each annotation (diagnostic on failure)
//   2. pick the target symbol (declared kind decides between the owning
//      symbol and the definition right after the comment)
//   3. drop repeated variants per target symbol
//   4. compute identities; two targets sharing one identity drop the file

use std::collections::{BTreeMap, BTreeSet};

use crate::features::extraction::RawAnnotation;
use crate::features::graph_builder::domain::{EntityId, Provenance};
use crate::features::schema::{AnnotationRecord, SchemaValidator};
use crate::features::scanning::ScannedFile;
use crate::shared::models::{Diagnostic, DiagnosticKind, Diagnostics, Span, SymbolId, SymbolKind};
use crate::shared::IdGenerator;

/// One validated annotation, keyed by the identity it contributes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub id: EntityId,
    pub file: String,
    pub module_path: String,
    pub qualified_name: String,
    pub fqn: String,
    /// Structural kind of the target symbol
    pub kind: SymbolKind,
    pub span: Span,
    /// Identity of the nearest enclosing symbol, when that symbol is annotated too
    pub parent: Option<EntityId>,
    pub record: AnnotationRecord,
    pub provenance: Provenance,
}

/// Where an annotation lands. `None` stands for the module of a file
/// without a symbol table.
type Target = Option<SymbolId>;

#[derive(Debug, Clone, Copy, Default)]
pub struct EntityResolver {
    validator: SchemaValidator,
}

impl EntityResolver {
    pub fn new(validator: SchemaValidator) -> Self {
        Self { validator }
    }

    /// Resolve all annotations of one file.
    ///
    /// Returns an empty list (plus an error diagnostic) when two distinct
    /// annotated symbols map to the same identity.
    pub fn resolve_file(
        &self,
        file: &ScannedFile,
        mut raws: Vec<RawAnnotation>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<ResolvedRecord> {
        raws.sort_by_key(|r| (r.sentinel_line, r.rank));

        let mut accepted: Vec<(Target, RawAnnotation, AnnotationRecord)> = Vec::new();
        let mut seen: BTreeSet<(Target, String)> = BTreeSet::new();

        for raw in raws {
            let record = match self.validator.validate(&raw) {
                Ok(record) => record,
                Err(diagnostic) => {
                    diagnostics.push(diagnostic);
                    continue;
                }
            };

            let target = self.target_for(file, &raw, &record, diagnostics);

            if !seen.insert((target, raw.variant.clone())) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateAnnotation,
                    raw.file_path.as_str(),
                    raw.span(),
                    format!(
                        "duplicate '{}' annotation for {}; keeping the first one",
                        raw.variant,
                        describe(file, target)
                    ),
                ));
                continue;
            }

            accepted.push((target, raw, record));
        }

        if accepted.is_empty() {
            return Vec::new();
        }

        // Identity uniqueness among annotated symbols
        let mut identities: BTreeMap<EntityId, Target> = BTreeMap::new();
        for (target, raw, _) in &accepted {
            let (qualified, kind, _) = structure_of(file, *target, raw);
            let id = IdGenerator::entity_id(&file.file_path, &qualified, kind);
            match identities.get(&id) {
                Some(existing) if existing != target => {
                    tracing::warn!(
                        file = %file.file_path,
                        symbol = %qualified,
                        "Identity conflict; dropping file"
                    );
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::IdentityConflictError,
                        file.file_path.as_str(),
                        raw.span(),
                        format!(
                            "{} and {} resolve to the same identity {}; file skipped",
                            describe(file, *existing),
                            describe(file, *target),
                            id
                        ),
                    ));
                    return Vec::new();
                }
                Some(_) => {}
                None => {
                    identities.insert(id, *target);
                }
            }
        }

        let annotated: BTreeSet<SymbolId> = accepted.iter().filter_map(|(t, _, _)| *t).collect();

        accepted
            .into_iter()
            .map(|(target, raw, record)| {
                let (qualified_name, kind, span) = structure_of(file, target, &raw);
                let parent = target
                    .and_then(|id| file.symbol(id))
                    .and_then(|s| s.parent)
                    .filter(|p| annotated.contains(p))
                    .and_then(|p| file.symbol(p))
                    .map(|p| IdGenerator::entity_id(&file.file_path, &p.qualified_name, p.kind));

                ResolvedRecord {
                    id: IdGenerator::entity_id(&file.file_path, &qualified_name, kind),
                    file: file.file_path.clone(),
                    module_path: file.module_path.clone(),
                    fqn: fqn(&file.module_path, &qualified_name),
                    qualified_name,
                    kind,
                    span,
                    parent,
                    provenance: Provenance {
                        variant: raw.variant.clone(),
                        token: raw.token.clone(),
                        rank: raw.rank,
                        file: raw.file_path.clone(),
                        span: raw.span(),
                    },
                    record,
                }
            })
            .collect()
    }

    /// Owning symbol if its kind matches the declared one, else the adjacent
    /// definition if that matches, else the owning symbol with a warning.
    fn target_for(
        &self,
        file: &ScannedFile,
        raw: &RawAnnotation,
        record: &AnnotationRecord,
        diagnostics: &mut Diagnostics,
    ) -> Target {
        let kind_of = |target: Target| match target {
            Some(id) => file.symbol(id).map(|s| s.kind),
            None => Some(SymbolKind::Module),
        };

        if kind_of(raw.symbol) == Some(record.kind) {
            return raw.symbol;
        }
        if let Some(adjacent) = raw.adjacent {
            if kind_of(Some(adjacent)) == Some(record.kind) {
                return Some(adjacent);
            }
        }

        if let Some(structural) = kind_of(raw.symbol) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::KindMismatch,
                raw.file_path.as_str(),
                raw.span(),
                format!(
                    "[{}] declared type '{}' but {} is a {}",
                    raw.variant,
                    record.kind,
                    describe(file, raw.symbol),
                    structural
                ),
            ));
        }
        raw.symbol
    }
}

/// (qualified name, structural kind, span) of a target
fn structure_of(file: &ScannedFile, target: Target, raw: &RawAnnotation) -> (String, SymbolKind, Span) {
    match target.and_then(|id| file.symbol(id)) {
        Some(symbol) => (symbol.qualified_name.clone(), symbol.kind, symbol.span),
        // Unstructured file: the annotation's text span covers the whole file
        None => (String::new(), SymbolKind::Module, raw.text_span),
    }
}

fn describe(file: &ScannedFile, target: Target) -> String {
    match target.and_then(|id| file.symbol(id)) {
        Some(s) if !s.qualified_name.is_empty() => format!("{} '{}'", s.kind, s.qualified_name),
        _ => format!("module '{}'", file.module_path),
    }
}

/// `module.qualified`, or just the module path for module-level entities
pub(crate) fn fqn(module_path: &str, qualified_name: &str) -> String {
    match (module_path.is_empty(), qualified_name.is_empty()) {
        (_, true) => module_path.to_string(),
        (true, false) => qualified_name.to_string(),
        (false, false) => format!("{}.{}", module_path, qualified_name),
    }
}
