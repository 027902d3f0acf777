//! Hunt strategy.

use craftplan_core::{
    GameData, HuntNode, Operator, ResourceKind, TreeNode, VariantGroup, VariantMode,
};
use serde_json::json;
use tracing::debug;

use super::{ceil_div_f64, AcquisitionBuilder};
use crate::context::BuildContext;
use crate::variants::filter_resource_variants;

/// Leaf for hunting `mob`, with targets narrowed to what its loot drops.
fn hunt_leaf(data: &GameData, mob: &str, targets: &[String], remaining: u32, ctx: &BuildContext) -> TreeNode {
    let loot = data.loot(mob).unwrap_or_default();
    let drops: Vec<_> = loot
        .iter()
        .filter(|drop| targets.contains(&drop.item))
        .collect();

    let (target_item, per_kill) = if drops.is_empty() {
        (VariantGroup::one_of(targets.iter().cloned()), 0.0)
    } else {
        let mut group = VariantGroup::empty(VariantMode::OneOf);
        let mut best: f64 = 0.0;
        for drop in &drops {
            let expected = drop.expected_per_kill();
            best = best.max(expected);
            group.push_with_metadata(drop.item.clone(), json!({ "yield": expected }));
        }
        (group, best)
    };

    let mut node = TreeNode::Hunt(HuntNode {
        operator: Operator::And,
        variant_mode: Some(target_item.mode),
        what: VariantGroup::single(mob.to_string()),
        count: ceil_div_f64(remaining, per_kill),
        target_item,
        children: VariantGroup::default(),
        context: Some(ctx.snapshot()),
    });
    node.simplify_variants();
    node
}

/// Build hunt nodes for mobs whose loot includes any of `targets`.
///
/// Several mobs become one OR node with a leaf per mob; a single mob is
/// returned as a bare leaf.
pub fn build_hunt_nodes(
    builder: &dyn AcquisitionBuilder,
    targets: &[String],
    remaining: u32,
    ctx: &BuildContext,
) -> Vec<TreeNode> {
    let data = builder.data();

    let mut mobs: Vec<String> = Vec::new();
    for target in targets {
        for mob in data.mobs_dropping(target) {
            if !mobs.iter().any(|m| m == mob) {
                mobs.push(mob.to_string());
            }
        }
    }
    if mobs.is_empty() {
        return Vec::new();
    }

    let mobs = filter_resource_variants(ctx, ResourceKind::Entity, &mobs);
    if mobs.is_empty() {
        debug!(?targets, "no reachable mobs");
        return Vec::new();
    }

    let leaves: Vec<TreeNode> = mobs
        .iter()
        .map(|mob| hunt_leaf(data, mob, targets, remaining, ctx))
        .collect();
    if leaves.len() == 1 {
        return leaves;
    }

    let node = HuntNode {
        operator: Operator::Or,
        variant_mode: Some(VariantMode::OneOf),
        what: VariantGroup::one_of(mobs.iter().cloned()),
        count: remaining,
        target_item: VariantGroup::one_of(targets.iter().cloned()),
        children: VariantGroup::from_values(VariantMode::AnyOf, leaves),
        context: Some(ctx.snapshot()),
    };
    vec![TreeNode::Hunt(node)]
}
