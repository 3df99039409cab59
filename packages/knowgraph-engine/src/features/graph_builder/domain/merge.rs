// Field-level merge across sentinel variants
//
// Records are overlaid oldest-rank first, so for every leaf field the value
// from the highest-rank record that defines it wins. Leaves are scalars,
// whole sets (tags, services, ...), whole link lists, and individual
// extension keys.

use crate::features::schema::{AnnotationRecord, Compliance, Context, Dependencies, Operational};

/// Merge records already sorted by ascending precedence
pub fn merge_records<'a, I>(records: I) -> Option<AnnotationRecord>
where
    I: IntoIterator<Item = &'a AnnotationRecord>,
{
    let mut iter = records.into_iter();
    let first = iter.next()?.clone();
    Some(iter.fold(first, overlay))
}

/// Lay `top` over `base`: `top` wins wherever it defines a leaf
fn overlay(base: AnnotationRecord, top: &AnnotationRecord) -> AnnotationRecord {
    let mut extensions = base.extensions;
    extensions.extend(top.extensions.iter().map(|(k, v)| (k.clone(), v.clone())));

    AnnotationRecord {
        kind: top.kind,
        description: top.description.clone(),
        owner: top.owner.clone().or(base.owner),
        status: top.status.or(base.status),
        tags: top.tags.clone().or(base.tags),
        links: top.links.clone().or(base.links),
        context: section(base.context, top.context.as_ref(), |b, t| Context {
            business_goal: t.business_goal.clone().or(b.business_goal),
            funnel_stage: t.funnel_stage.or(b.funnel_stage),
            revenue_impact: t.revenue_impact.or(b.revenue_impact),
        }),
        dependencies: section(base.dependencies, top.dependencies.as_ref(), |b, t| Dependencies {
            services: t.services.clone().or(b.services),
            databases: t.databases.clone().or(b.databases),
            external_apis: t.external_apis.clone().or(b.external_apis),
        }),
        compliance: section(base.compliance, top.compliance.as_ref(), |b, t| Compliance {
            regulations: t.regulations.clone().or(b.regulations),
            data_sensitivity: t.data_sensitivity.or(b.data_sensitivity),
            audit_requirements: t.audit_requirements.clone().or(b.audit_requirements),
        }),
        operational: section(base.operational, top.operational.as_ref(), |b, t| Operational {
            sla: t.sla.clone().or(b.sla),
            on_call_team: t.on_call_team.clone().or(b.on_call_team),
            monitoring_dashboards: t.monitoring_dashboards.clone().or(b.monitoring_dashboards),
        }),
        extensions,
    }
}

fn section<T: Clone>(base: Option<T>, top: Option<&T>, merge: impl FnOnce(T, &T) -> T) -> Option<T> {
    match (base, top) {
        (Some(b), Some(t)) => Some(merge(b, t)),
        (None, Some(t)) => Some(t.clone()),
        (b, None) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::schema::{FunnelStage, MetaValue, RevenueImpact, Status};
    use crate::shared::models::SymbolKind;
    use std::collections::BTreeSet;

    fn record(description: &str) -> AnnotationRecord {
        AnnotationRecord::new(SymbolKind::Function, description)
    }

    fn set(items: &[&str]) -> Option<BTreeSet<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_owner_falls_back_to_lower_rank() {
        let mut legacy = record("legacy");
        legacy.owner = Some("test-team".into());
        let current = record("current");

        let merged = merge_records([&legacy, &current]).unwrap();
        assert_eq!(merged.owner.as_deref(), Some("test-team"));
        assert_eq!(merged.description, "current");
    }

    #[test]
    fn test_owner_override_by_higher_rank() {
        let mut legacy = record("legacy");
        legacy.owner = Some("old-team".into());
        let mut current = record("current");
        current.owner = Some("new-team".into());

        let merged = merge_records([&legacy, &current]).unwrap();
        assert_eq!(merged.owner.as_deref(), Some("new-team"));
    }

    #[test]
    fn test_tags_are_replaced_not_unioned() {
        let mut legacy = record("legacy");
        legacy.tags = set(&["testing", "sample"]);
        let mut current = record("current");
        current.tags = set(&["math"]);

        let merged = merge_records([&legacy, &current]).unwrap();
        assert_eq!(merged.tags, set(&["math"]));
    }

    #[test]
    fn test_nested_sections_merge_per_leaf() {
        let mut legacy = record("legacy");
        legacy.context = Some(Context {
            business_goal: Some("Grow revenue".into()),
            funnel_stage: Some(FunnelStage::Acquisition),
            revenue_impact: None,
        });
        legacy.status = Some(Status::Experimental);
        let mut current = record("current");
        current.context = Some(Context {
            funnel_stage: Some(FunnelStage::Revenue),
            revenue_impact: Some(RevenueImpact::High),
            ..Default::default()
        });

        let merged = merge_records([&legacy, &current]).unwrap();
        let ctx = merged.context.unwrap();
        assert_eq!(ctx.business_goal.as_deref(), Some("Grow revenue"));
        assert_eq!(ctx.funnel_stage, Some(FunnelStage::Revenue));
        assert_eq!(ctx.revenue_impact, Some(RevenueImpact::High));
        assert_eq!(merged.status, Some(Status::Experimental));
    }

    #[test]
    fn test_extensions_merge_per_key() {
        let mut legacy = record("legacy");
        legacy.extensions.insert("team_size".into(), MetaValue::from("4"));
        legacy.extensions.insert("pager".into(), MetaValue::from("old"));
        let mut current = record("current");
        current.extensions.insert("pager".into(), MetaValue::from("new"));

        let merged = merge_records([&legacy, &current]).unwrap();
        assert_eq!(merged.extensions.get("team_size"), Some(&MetaValue::from("4")));
        assert_eq!(merged.extensions.get("pager"), Some(&MetaValue::from("new")));
    }

    #[test]
    fn test_single_and_empty() {
        let only = record("only");
        assert_eq!(merge_records([&only]), Some(only.clone()));
        assert_eq!(merge_records(std::iter::empty()), None);
    }
}
