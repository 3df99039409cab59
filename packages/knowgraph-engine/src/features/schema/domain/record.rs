//! Normalized annotation record

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::MetaValue;
use crate::shared::models::SymbolKind;

/// Defines a closed, lower-case string enumeration
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Allowed values, for error messages
            pub fn expected() -> String {
                Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// Lifecycle status
    Status {
        Stable => "stable",
        Experimental => "experimental",
        Deprecated => "deprecated",
    }
);

string_enum!(
    /// Customer funnel stage served by the code
    FunnelStage {
        Awareness => "awareness",
        Acquisition => "acquisition",
        Activation => "activation",
        Retention => "retention",
        Revenue => "revenue",
        Referral => "referral",
    }
);

string_enum!(
    RevenueImpact {
        Critical => "critical",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

string_enum!(
    DataSensitivity {
        Public => "public",
        Internal => "internal",
        Confidential => "confidential",
        Restricted => "restricted",
    }
);

/// External document reference (`links`, `operational.monitoring_dashboards`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "type")]
    pub link_type: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel_stage: Option<FunnelStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_impact: Option<RevenueImpact>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databases: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_apis: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compliance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulations: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_sensitivity: Option<DataSensitivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_requirements: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operational {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_call_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_dashboards: Option<Vec<Link>>,
}

/// A validated annotation.
///
/// Every optional field is independently absent or present; absence is
/// what lets a newer sentinel variant inherit a field from an older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Declared kind (`type:` / `kind:`)
    pub kind: SymbolKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Dependencies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<Compliance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational: Option<Operational>,
    /// Unknown keys, by dotted path (`team_size`, `context.team_size`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, MetaValue>,
}

impl AnnotationRecord {
    pub fn new(kind: SymbolKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            owner: None,
            status: None,
            tags: None,
            links: None,
            context: None,
            dependencies: None,
            compliance: None,
            operational: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Flatten into leaf field paths → values.
    ///
    /// Leaves are the merge and diff granularity: scalars, sets and link
    /// lists are each one leaf; every extension key is its own leaf.
    pub fn fields(&self) -> BTreeMap<String, MetaValue> {
        let mut out = BTreeMap::new();
        let mut put = |path: &str, value: Option<MetaValue>| {
            if let Some(v) = value {
                out.insert(path.to_string(), v);
            }
        };

        put("kind", Some(self.kind.as_str().into()));
        put("description", Some(self.description.as_str().into()));
        put("owner", self.owner.as_deref().map(MetaValue::from));
        put("status", self.status.map(|s| s.as_str().into()));
        put("tags", self.tags.as_ref().map(set_value));
        put("links", self.links.as_deref().map(links_value));

        if let Some(ctx) = &self.context {
            put("context.business_goal", ctx.business_goal.as_deref().map(MetaValue::from));
            put("context.funnel_stage", ctx.funnel_stage.map(|s| s.as_str().into()));
            put("context.revenue_impact", ctx.revenue_impact.map(|s| s.as_str().into()));
        }
        if let Some(deps) = &self.dependencies {
            put("dependencies.services", deps.services.as_ref().map(set_value));
            put("dependencies.databases", deps.databases.as_ref().map(set_value));
            put("dependencies.external_apis", deps.external_apis.as_ref().map(set_value));
        }
        if let Some(c) = &self.compliance {
            put("compliance.regulations", c.regulations.as_ref().map(set_value));
            put("compliance.data_sensitivity", c.data_sensitivity.map(|s| s.as_str().into()));
            put("compliance.audit_requirements", c.audit_requirements.as_ref().map(set_value));
        }
        if let Some(op) = &self.operational {
            put("operational.sla", op.sla.as_deref().map(MetaValue::from));
            put("operational.on_call_team", op.on_call_team.as_deref().map(MetaValue::from));
            put(
                "operational.monitoring_dashboards",
                op.monitoring_dashboards.as_deref().map(links_value),
            );
        }
        for (key, value) in &self.extensions {
            put(&format!("extensions.{}", key), Some(value.clone()));
        }
        out
    }

    /// Tags, or an empty set when absent
    pub fn tag_set(&self) -> BTreeSet<String> {
        self.tags.clone().unwrap_or_default()
    }
}

fn set_value(set: &BTreeSet<String>) -> MetaValue {
    MetaValue::Sequence(set.iter().map(|s| MetaValue::from(s.as_str())).collect())
}

fn links_value(links: &[Link]) -> MetaValue {
    MetaValue::Sequence(
        links
            .iter()
            .map(|l| {
                let mut m = BTreeMap::new();
                m.insert("type".to_string(), MetaValue::from(l.link_type.as_str()));
                m.insert("url".to_string(), MetaValue::from(l.url.as_str()));
                if let Some(title) = &l.title {
                    m.insert("title".to_string(), MetaValue::from(title.as_str()));
                }
                MetaValue::Mapping(m)
            })
            .collect(),
    )
}
