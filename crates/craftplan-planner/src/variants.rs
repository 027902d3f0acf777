//! Variant resolution against recorded constraints and the world budget.

use craftplan_core::{ResourceKind, VariantGroup, VariantMode};
use tracing::debug;

use crate::context::BuildContext;

/// Decide which of `items` are in play for this branch.
///
/// The first item of the group is its primary key. A required variant
/// recorded for it wins (as a single `one_of`), then an allowed set (as
/// `any_of`, intersected with the group), and otherwise the whole group is
/// offered as `one_of`.
pub fn resolve_variants_for_item(items: &[String], ctx: &BuildContext) -> VariantGroup<String> {
    let Some(primary) = items.first() else {
        return VariantGroup::empty(VariantMode::OneOf);
    };
    let constraints = &ctx.variant_constraints;

    if let Some(required) = constraints.required_variant(primary) {
        if items.iter().any(|item| item == required) {
            return VariantGroup::single(required.to_string());
        }
    }

    if let Some(allowed) = constraints.allowed_variants(primary) {
        let narrowed: Vec<String> = items
            .iter()
            .filter(|item| allowed.contains(*item))
            .cloned()
            .collect();
        if !narrowed.is_empty() {
            return VariantGroup::any_of(narrowed);
        }
    }

    VariantGroup::one_of(items.iter().cloned())
}

/// Names among `names` the world can supply.
///
/// Without pruning (or without a budget) the input comes back unchanged.
/// With pruning an empty result means there is no source here.
pub fn filter_resource_variants(ctx: &BuildContext, kind: ResourceKind, names: &[String]) -> Vec<String> {
    let budget = match (&ctx.world_budget, ctx.prune_with_world) {
        (Some(budget), true) => budget,
        _ => return names.to_vec(),
    };
    let available: Vec<String> = names
        .iter()
        .filter(|name| budget.can(kind, name, 1))
        .cloned()
        .collect();
    if available.len() < names.len() {
        debug!(?kind, requested = names.len(), available = available.len(), "world budget narrowed sources");
    }
    available
}

/// Record a decided `one_of` resolution so later lookups of the same group
/// reuse it. Returns true when a commitment was recorded.
pub fn add_variant_constraint(ctx: &mut BuildContext, items: &[String], resolved: &VariantGroup<String>) -> bool {
    let Some(primary) = items.first() else {
        return false;
    };
    if items.len() < 2 || !resolved.is_collapsed() {
        return false;
    }
    match resolved.first() {
        Some(variant) => {
            ctx.variant_constraints.require(primary, variant);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use craftplan_core::{Inventory, WorldBudget};

    use super::*;

    fn planks() -> Vec<String> {
        ["birch_planks", "oak_planks", "spruce_planks"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_unconstrained_group_is_one_of() {
        let ctx = BuildContext::new(Inventory::new());
        let resolved = resolve_variants_for_item(&planks(), &ctx);
        assert_eq!(resolved.mode, VariantMode::OneOf);
        assert_eq!(resolved.len(), 3);
    }

    #[test]
    fn test_required_variant_wins() {
        let mut ctx = BuildContext::new(Inventory::new());
        ctx.variant_constraints.allow("birch_planks", &["oak_planks"]);
        ctx.variant_constraints.require("birch_planks", "spruce_planks");
        let resolved = resolve_variants_for_item(&planks(), &ctx);
        assert!(resolved.is_collapsed());
        assert_eq!(resolved.first().map(String::as_str), Some("spruce_planks"));
    }

    #[test]
    fn test_allowed_set_is_any_of() {
        let mut ctx = BuildContext::new(Inventory::new());
        ctx.variant_constraints.allow("birch_planks", &["oak_planks", "spruce_planks", "cherry_planks"]);
        let resolved = resolve_variants_for_item(&planks(), &ctx);
        assert_eq!(resolved.mode, VariantMode::AnyOf);
        assert_eq!(resolved.values().cloned().collect::<Vec<_>>(), vec!["oak_planks", "spruce_planks"]);
    }

    #[test]
    fn test_resource_filter_returns_subset_or_empty() {
        let names = vec!["stone".to_string(), "deepslate".to_string()];
        let mut ctx = BuildContext::new(Inventory::new());
        assert_eq!(filter_resource_variants(&ctx, ResourceKind::Block, &names), names);

        ctx.prune_with_world = true;
        ctx.world_budget = Some(Arc::new(WorldBudget::new().with_block("deepslate", 4)));
        assert_eq!(
            filter_resource_variants(&ctx, ResourceKind::Block, &names),
            vec!["deepslate".to_string()]
        );

        ctx.world_budget = Some(Arc::new(WorldBudget::new()));
        assert!(filter_resource_variants(&ctx, ResourceKind::Block, &names).is_empty());
    }

    #[test]
    fn test_constraint_recorded_only_for_decided_groups() {
        let mut ctx = BuildContext::new(Inventory::new());
        let undecided = VariantGroup::one_of(planks());
        assert!(!add_variant_constraint(&mut ctx, &planks(), &undecided));

        let decided = VariantGroup::single("oak_planks".to_string());
        assert!(add_variant_constraint(&mut ctx, &planks(), &decided));
        assert_eq!(ctx.variant_constraints.required_variant("birch_planks"), Some("oak_planks"));
    }
}
