//! Sentinel detection and body isolation

use std::collections::BTreeSet;

use super::leader::{is_fence, split_leader, strip_closer, Leader};
use crate::features::extraction::domain::{RawAnnotation, Sentinel, SentinelRegistry};
use crate::features::scanning::{ScannedFile, TextSpan};
use crate::shared::models::{Diagnostic, DiagnosticKind, Diagnostics, Span};

/// Body lines as (0-based index into the span, leader-stripped text)
type BodyLines = Vec<(usize, String)>;

/// Detects sentinel markers in text spans
#[derive(Debug, Clone, Default)]
pub struct AnnotationExtractor {
    registry: SentinelRegistry,
}

impl AnnotationExtractor {
    pub fn new(registry: SentinelRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SentinelRegistry {
        &self.registry
    }

    /// Extract all annotations of a scanned file, in source order
    pub fn extract_file(&self, file: &ScannedFile, diagnostics: &mut Diagnostics) -> Vec<RawAnnotation> {
        let annotations: Vec<RawAnnotation> = file
            .spans()
            .flat_map(|span| self.extract(span, diagnostics))
            .collect();
        tracing::trace!(
            file = %file.file_path,
            annotations = annotations.len(),
            "Extracted annotations"
        );
        annotations
    }

    /// Extract at most one annotation per sentinel variant from a span.
    ///
    /// A span without a sentinel yields nothing; that is the common case.
    pub fn extract(&self, span: &TextSpan, diagnostics: &mut Diagnostics) -> Vec<RawAnnotation> {
        let lines: Vec<&str> = span
            .text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        let line_no = |idx: usize| span.span.start_line + idx as u32;

        let mut annotations = Vec::new();
        let mut seen_variants = BTreeSet::new();
        let mut i = 0;
        while i < lines.len() {
            let Some((sentinel, leader)) = self.sentinel_at(lines[i]) else {
                i += 1;
                continue;
            };
            let sentinel_line = line_no(i);
            let (body_lines, next) = self.collect_body(&lines, i + 1, leader);
            i = next.max(i + 1);

            if !seen_variants.insert(sentinel.variant.clone()) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateAnnotation,
                    span.file_path.as_str(),
                    Span::line(sentinel_line),
                    format!(
                        "second '{}' annotation in the same comment ignored",
                        sentinel.variant
                    ),
                ));
                continue;
            }

            let (body, body_span) = match normalize_body(body_lines) {
                Some((body, first, last)) => (body, Span::new(line_no(first), line_no(last))),
                None => (String::new(), Span::line(sentinel_line)),
            };

            annotations.push(RawAnnotation {
                file_path: span.file_path.clone(),
                variant: sentinel.variant.clone(),
                token: sentinel.token.clone(),
                rank: sentinel.rank,
                sentinel_line,
                text_span: span.span,
                body_span,
                body,
                symbol: span.symbol,
                adjacent: span.adjacent,
            });
        }
        annotations
    }

    /// Sentinel on this line, with the line's comment leader
    fn sentinel_at(&self, line: &str) -> Option<(&Sentinel, Leader)> {
        let (leader, rest) = split_leader(line);
        let (rest, _) = strip_closer(rest);
        self.registry
            .match_token(rest.trim())
            .map(|sentinel| (sentinel, leader))
    }

    /// Collect body lines starting at `start`; returns them with the index
    /// where scanning should resume
    fn collect_body(&self, lines: &[&str], start: usize, leader: Leader) -> (BodyLines, usize) {
        let mut body = Vec::new();
        let mut k = start;
        while k < lines.len() {
            let line = lines[k];
            if self.sentinel_at(line).is_some() {
                break;
            }

            let content = match leader {
                Leader::Line(marker) => {
                    let trimmed = line.trim_start();
                    if trimmed.starts_with("*/") {
                        k += 1;
                        break;
                    }
                    // comment ended
                    let Some(rest) = trimmed.strip_prefix(marker) else {
                        break;
                    };
                    rest
                }
                Leader::Opener | Leader::None => match split_leader(line) {
                    (Leader::Line("*"), rest) if leader == Leader::Opener => rest,
                    _ => line,
                },
            };

            if is_fence(content) {
                k += 1;
                break;
            }

            let (content, closed) = strip_closer(content);
            if !(closed && content.trim().is_empty()) {
                body.push((k, content.to_string()));
            }
            k += 1;
            if closed {
                break;
            }
        }
        (body, k)
    }
}

/// Trim blank edges and dedent. Returns (text, first index, last index).
fn normalize_body(lines: BodyLines) -> Option<(String, usize, usize)> {
    let first = lines.iter().position(|(_, l)| !l.trim().is_empty())?;
    let last = lines.iter().rposition(|(_, l)| !l.trim().is_empty())?;
    let kept = &lines[first..=last];

    let indent = kept
        .iter()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(_, l)| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let text = kept
        .iter()
        .map(|(_, l)| {
            if l.trim().is_empty() {
                ""
            } else {
                l.get(indent..).unwrap_or("").trim_end()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some((text, kept[0].0, kept[kept.len() - 1].0))
}
