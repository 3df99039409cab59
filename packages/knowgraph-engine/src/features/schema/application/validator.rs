//! Annotation body → AnnotationRecord
//!
//! Two failure classes, both per record and never fatal to the scan:
//! - `SchemaError`: the body is not a restricted-YAML mapping
//! - `ValidationError`: the first field that violates its constraint

use std::collections::{BTreeMap, BTreeSet};

use crate::features::extraction::RawAnnotation;
use crate::features::schema::domain::{
    AnnotationRecord, Compliance, Context, DataSensitivity, Dependencies, FunnelStage, Link,
    MetaValue, Operational, RevenueImpact, Status,
};
use crate::shared::models::{Diagnostic, Span, SymbolKind};

const TOP_LEVEL_KEYS: &[&str] = &[
    "type",
    "kind",
    "description",
    "owner",
    "status",
    "tags",
    "links",
    "context",
    "dependencies",
    "compliance",
    "operational",
];

/// A field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldError {
    /// Reported field path (`context.funnel_stage`)
    field: String,
    /// Key path used to find the offending line in the body
    key: String,
    message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            key: field.clone(),
            field,
            message: message.into(),
        }
    }

    fn at_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

type FieldResult<T> = Result<T, FieldError>;

/// Parse failure: (0-based body line if known, message)
type ParseFailure = (Option<usize>, String);

/// Validates and normalizes annotation bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Parse and validate one annotation.
    ///
    /// Returns the normalized record, or the single diagnostic that
    /// rejected it.
    pub fn validate(&self, raw: &RawAnnotation) -> Result<AnnotationRecord, Diagnostic> {
        let value = parse_body(&raw.body).map_err(|(line, message)| {
            let span = line
                .map(|l| Span::line(raw.body_line(l as u32)))
                .unwrap_or_else(|| raw.span());
            Diagnostic::schema(raw.file_path.as_str(), span, format!("[{}] {}", raw.variant, message))
        })?;

        let mapping = match value {
            MetaValue::Mapping(m) => m,
            // parse_body only returns mappings
            other => {
                return Err(Diagnostic::schema(
                    raw.file_path.as_str(),
                    raw.span(),
                    format!("annotation body must be a mapping, found {}", other.type_name()),
                ))
            }
        };

        normalize(&mapping).map_err(|e| {
            let span = locate_key(&raw.body, &e.key)
                .map(|l| Span::line(raw.body_line(l as u32)))
                .unwrap_or_else(|| raw.span());
            Diagnostic::validation(
                raw.file_path.as_str(),
                span,
                e.field,
                format!("[{}] {}", raw.variant, e.message),
            )
        })
    }

    /// Parse a body into a value tree without validating fields
    pub fn parse(&self, body: &str) -> Result<MetaValue, String> {
        parse_body(body).map_err(|(_, message)| message)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════════

fn parse_body(body: &str) -> Result<MetaValue, ParseFailure> {
    if body.trim().is_empty() {
        return Err((None, "annotation body is empty".to_string()));
    }
    if let Some((line, what)) = find_anchor_or_alias(body) {
        return Err((Some(line), format!("{} are not supported", what)));
    }

    let value: serde_yaml::Value = serde_yaml::from_str(body).map_err(|e| {
        let line = e.location().map(|loc| loc.line().saturating_sub(1));
        (line, e.to_string())
    })?;

    match convert(value).map_err(|message| (None, message))? {
        mapping @ MetaValue::Mapping(_) => Ok(mapping),
        other => Err((
            None,
            format!("annotation body must be a mapping, found {}", other.type_name()),
        )),
    }
}

fn convert(value: serde_yaml::Value) -> Result<MetaValue, String> {
    use serde_yaml::Value;

    Ok(match value {
        Value::Null => MetaValue::Null,
        Value::Bool(b) => MetaValue::Bool(b),
        Value::Number(n) => {
            let number = if let Some(u) = n.as_u64() {
                Some(serde_json::Number::from(u))
            } else if let Some(i) = n.as_i64() {
                Some(serde_json::Number::from(i))
            } else {
                n.as_f64().and_then(serde_json::Number::from_f64)
            };
            number
                .map(MetaValue::Number)
                .unwrap_or_else(|| MetaValue::String(n.to_string()))
        }
        Value::String(s) => MetaValue::String(s),
        Value::Sequence(items) => MetaValue::Sequence(
            items
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = BTreeMap::new();
            for (k, v) in map {
                let key = match k {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(format!(
                            "mapping keys must be scalars, found {}",
                            yaml_type_name(&other)
                        ))
                    }
                };
                out.insert(key, convert(v)?);
            }
            MetaValue::Mapping(out)
        }
        Value::Tagged(tagged) => {
            return Err(format!("tagged value '{}' is not supported", tagged.tag));
        }
    })
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    use serde_yaml::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// serde_yaml resolves anchors and aliases silently; they are rejected
/// lexically before parsing. Returns (0-based line, construct).
/// Lines inside `|`/`>` block scalars are literal text and are skipped.
fn find_anchor_or_alias(body: &str) -> Option<(usize, &'static str)> {
    let mut block_indent: Option<usize> = None;

    for (idx, line) in body.lines().enumerate() {
        let indent = line.len() - line.trim_start().len();
        if let Some(opener) = block_indent {
            if line.trim().is_empty() || indent > opener {
                continue;
            }
            block_indent = None;
        }

        let mut in_single = false;
        let mut in_double = false;
        let mut prev_char: Option<char> = None;
        let mut prev_significant: Option<char> = None;
        let mut content_end = line.len();

        for (pos, c) in line.char_indices() {
            let at_token_start = matches!(prev_significant, None | Some(':' | '-' | '[' | '{' | ',' | '?'))
                && prev_char.map_or(true, char::is_whitespace)
                || matches!(prev_char, Some('[' | '{' | ','));

            if in_single {
                in_single = c != '\'';
            } else if in_double {
                in_double = !(c == '"' && prev_char != Some('\\'));
            } else {
                match c {
                    '#' if prev_char.map_or(true, char::is_whitespace) => {
                        content_end = pos;
                        break;
                    }
                    '\'' if at_token_start => in_single = true,
                    '"' if at_token_start => in_double = true,
                    '&' if at_token_start => return Some((idx, "anchors (&name)")),
                    '*' if at_token_start => return Some((idx, "aliases (*name)")),
                    _ => {}
                }
            }

            if !c.is_whitespace() {
                prev_significant = Some(c);
            }
            prev_char = Some(c);
        }

        if opens_block_scalar(&line[..content_end]) {
            block_indent = Some(indent);
        }
    }
    None
}

/// Line ends in a block scalar header: `key: |`, `- >-`, `key: |2+`
fn opens_block_scalar(content: &str) -> bool {
    let tail = content.trim_end();
    let Some(token) = tail.rsplit(char::is_whitespace).next() else {
        return false;
    };
    let mut chars = token.chars();
    if !matches!(chars.next(), Some('|' | '>')) || !chars.all(|c| matches!(c, '-' | '+' | '0'..='9')) {
        return false;
    }
    let before = tail[..tail.len() - token.len()].trim_end();
    before.is_empty() || before.ends_with(':') || before.ends_with('-')
}

/// 0-based body line holding a dotted key path, if it can be found
fn locate_key(body: &str, path: &str) -> Option<usize> {
    let lines: Vec<&str> = body.lines().collect();
    let mut start = 0;
    let mut parent_indent: Option<usize> = None;
    let mut found = None;

    for segment in path.split('.') {
        let segment = segment.split('[').next().unwrap_or(segment);
        let mut hit = None;
        for (idx, line) in lines.iter().enumerate().skip(start) {
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                continue;
            }
            let indent = line.len() - trimmed.len();
            if let Some(p) = parent_indent {
                if indent <= p {
                    break;
                }
            }
            let is_key = trimmed
                .strip_prefix(segment)
                .map(|rest| rest.trim_start().starts_with(':'))
                .unwrap_or(false);
            if is_key {
                hit = Some((idx, indent));
                break;
            }
        }
        let (idx, indent) = hit?;
        found = Some(idx);
        start = idx + 1;
        parent_indent = Some(indent);
    }
    found
}

// ═══════════════════════════════════════════════════════════════════════════
// Field validation (fail-fast)
// ═══════════════════════════════════════════════════════════════════════════

fn normalize(root: &BTreeMap<String, MetaValue>) -> FieldResult<AnnotationRecord> {
    let kind = declared_kind(root)?;
    let description = required_text(root.get("description"), "description")?;

    let mut record = AnnotationRecord::new(kind, description);
    record.owner = opt_text(root.get("owner"), "owner")?;
    record.status = opt_enum(root.get("status"), "status", Status::parse, Status::expected)?;
    record.tags = opt_set(root.get("tags"), "tags")?;
    record.links = opt_links(root.get("links"), "links")?;

    if let Some(m) = section(root.get("context"), "context")? {
        record.context = Some(Context {
            business_goal: opt_text(m.get("business_goal"), "context.business_goal")?,
            funnel_stage: opt_enum(
                m.get("funnel_stage"),
                "context.funnel_stage",
                FunnelStage::parse,
                FunnelStage::expected,
            )?,
            revenue_impact: opt_enum(
                m.get("revenue_impact"),
                "context.revenue_impact",
                RevenueImpact::parse,
                RevenueImpact::expected,
            )?,
        });
        keep_unknown(m, "context", &["business_goal", "funnel_stage", "revenue_impact"], &mut record.extensions);
    }

    if let Some(m) = section(root.get("dependencies"), "dependencies")? {
        record.dependencies = Some(Dependencies {
            services: opt_set(m.get("services"), "dependencies.services")?,
            databases: opt_set(m.get("databases"), "dependencies.databases")?,
            external_apis: opt_set(m.get("external_apis"), "dependencies.external_apis")?,
        });
        keep_unknown(m, "dependencies", &["services", "databases", "external_apis"], &mut record.extensions);
    }

    if let Some(m) = section(root.get("compliance"), "compliance")? {
        record.compliance = Some(Compliance {
            regulations: opt_set(m.get("regulations"), "compliance.regulations")?,
            data_sensitivity: opt_enum(
                m.get("data_sensitivity"),
                "compliance.data_sensitivity",
                DataSensitivity::parse,
                DataSensitivity::expected,
            )?,
            audit_requirements: opt_set(m.get("audit_requirements"), "compliance.audit_requirements")?,
        });
        keep_unknown(
            m,
            "compliance",
            &["regulations", "data_sensitivity", "audit_requirements"],
            &mut record.extensions,
        );
    }

    if let Some(m) = section(root.get("operational"), "operational")? {
        record.operational = Some(Operational {
            sla: opt_text(m.get("sla"), "operational.sla")?,
            on_call_team: opt_text(m.get("on_call_team"), "operational.on_call_team")?,
            monitoring_dashboards: opt_links(
                m.get("monitoring_dashboards"),
                "operational.monitoring_dashboards",
            )?,
        });
        keep_unknown(
            m,
            "operational",
            &["sla", "on_call_team", "monitoring_dashboards"],
            &mut record.extensions,
        );
    }

    for (key, value) in root {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            record.extensions.insert(key.clone(), value.clone());
        }
    }

    Ok(record)
}

/// Declared kind from `type:` or `kind:`
fn declared_kind(root: &BTreeMap<String, MetaValue>) -> FieldResult<SymbolKind> {
    let by_type = root.get("type").filter(|v| !v.is_null());
    let by_kind = root.get("kind").filter(|v| !v.is_null());

    let (value, key) = match (by_type, by_kind) {
        (None, None) => {
            return Err(FieldError::new("kind", "required field missing (declare `type:` or `kind:`)"))
        }
        (Some(t), Some(k)) if t != k => {
            return Err(FieldError::new(
                "kind",
                format!("`type` ({}) and `kind` ({}) disagree", t, k),
            )
            .at_key("kind"))
        }
        (Some(t), _) => (t, "type"),
        (None, Some(k)) => (k, "kind"),
    };

    let expected = || {
        SymbolKind::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    value
        .as_str()
        .and_then(SymbolKind::from_str)
        .ok_or_else(|| {
            FieldError::new("kind", format!("expected one of: {}, found {}", expected(), value)).at_key(key)
        })
}

fn required_text(value: Option<&MetaValue>, path: &str) -> FieldResult<String> {
    match opt_text(value, path)? {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(FieldError::new(path, "must not be empty")),
        None => Err(FieldError::new(path, "required field missing")),
    }
}

fn opt_text(value: Option<&MetaValue>, path: &str) -> FieldResult<Option<String>> {
    match value {
        None | Some(MetaValue::Null) => Ok(None),
        Some(v) => v
            .as_text()
            .map(Some)
            .ok_or_else(|| FieldError::new(path, format!("expected string, found {}", v.type_name()))),
    }
}

fn opt_enum<T>(
    value: Option<&MetaValue>,
    path: &str,
    parse: fn(&str) -> Option<T>,
    expected: fn() -> String,
) -> FieldResult<Option<T>> {
    match value {
        None | Some(MetaValue::Null) => Ok(None),
        Some(MetaValue::String(s)) => parse(s).map(Some).ok_or_else(|| {
            FieldError::new(path, format!("expected one of: {}, found '{}'", expected(), s))
        }),
        Some(v) => Err(FieldError::new(
            path,
            format!("expected one of: {}, found {}", expected(), v.type_name()),
        )),
    }
}

fn opt_set(value: Option<&MetaValue>, path: &str) -> FieldResult<Option<BTreeSet<String>>> {
    match value {
        None | Some(MetaValue::Null) => Ok(None),
        Some(MetaValue::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_text().ok_or_else(|| {
                    FieldError::new(
                        path,
                        format!("item {}: expected string, found {}", i + 1, item.type_name()),
                    )
                })
            })
            .collect::<FieldResult<BTreeSet<_>>>()
            .map(Some),
        Some(v) => Err(FieldError::new(
            path,
            format!("expected sequence of strings, found {}", v.type_name()),
        )),
    }
}

fn opt_links(value: Option<&MetaValue>, path: &str) -> FieldResult<Option<Vec<Link>>> {
    let items = match value {
        None | Some(MetaValue::Null) => return Ok(None),
        Some(MetaValue::Sequence(items)) => items,
        Some(v) => {
            return Err(FieldError::new(
                path,
                format!("expected sequence of links, found {}", v.type_name()),
            ))
        }
    };

    let mut links = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let entry = format!("{}[{}]", path, i);
        let m = item.as_mapping().ok_or_else(|| {
            FieldError::new(&entry, format!("expected mapping with type and url, found {}", item.type_name()))
                .at_key(path)
        })?;
        if let Some(unknown) = m.keys().find(|k| !matches!(k.as_str(), "type" | "url" | "title")) {
            return Err(FieldError::new(format!("{}.{}", entry, unknown), "unknown link key").at_key(path));
        }
        let link_type = required_text(m.get("type"), &format!("{}.type", entry)).map_err(|e| e.at_key(path))?;
        let url = required_text(m.get("url"), &format!("{}.url", entry)).map_err(|e| e.at_key(path))?;
        let title = opt_text(m.get("title"), &format!("{}.title", entry)).map_err(|e| e.at_key(path))?;
        links.push(Link { link_type, url, title });
    }
    Ok(Some(links))
}

fn section<'v>(
    value: Option<&'v MetaValue>,
    path: &str,
) -> FieldResult<Option<&'v BTreeMap<String, MetaValue>>> {
    match value {
        None | Some(MetaValue::Null) => Ok(None),
        Some(MetaValue::Mapping(m)) => Ok(Some(m)),
        Some(v) => Err(FieldError::new(path, format!("expected mapping, found {}", v.type_name()))),
    }
}

fn keep_unknown(
    map: &BTreeMap<String, MetaValue>,
    section: &str,
    known: &[&str],
    extensions: &mut BTreeMap<String, MetaValue>,
) {
    for (key, value) in map {
        if !known.contains(&key.as_str()) {
            extensions.insert(format!("{}.{}", section, key), value.clone());
        }
    }
}
