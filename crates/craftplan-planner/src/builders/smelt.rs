//! Smelt strategy.

use craftplan_core::{ItemStack, Operator, SmeltNode, TreeNode, VariantGroup, FURNACE};
use tracing::debug;

use super::{ceil_div_f64, AcquisitionBuilder};
use crate::context::BuildContext;
use crate::dependencies::inject_workstation_dependency;

/// Request `shortfall` units of `item` from a new subtree. What the subtree
/// draws from the branch inventory is taken out of `ctx`.
fn request_shortfall(
    builder: &dyn AcquisitionBuilder,
    children: &mut VariantGroup<TreeNode>,
    ctx: &mut BuildContext,
    item: &str,
    shortfall: u32,
) {
    if shortfall == 0 {
        debug!(item, "smelting input covered by inventory");
        return;
    }
    let root = TreeNode::Root(builder.build_recipe_tree(&[item.to_string()], shortfall, ctx));
    ctx.consume(&root);
    children.push(root);
}

/// Build one smelt node per furnace input producing any of `targets`.
pub fn build_smelt_nodes(
    builder: &dyn AcquisitionBuilder,
    targets: &[String],
    remaining: u32,
    ctx: &BuildContext,
) -> Vec<TreeNode> {
    let data = builder.data();
    let fuel = builder.config().fuel.as_str();
    let smelts_per_fuel = data.fuel_rate(fuel).unwrap_or(1.0);
    let fuel_needed = ceil_div_f64(remaining, smelts_per_fuel);

    let mut nodes = Vec::new();
    for target in targets {
        for recipe in data.smelting_inputs_for(target) {
            let mut node_ctx = ctx.clone();
            let mut node = SmeltNode {
                operator: Operator::And,
                variant_mode: None,
                what: VariantGroup::single(FURNACE.to_string()),
                count: remaining,
                input: VariantGroup::single(ItemStack::new(recipe.input.as_str(), 1)),
                result: VariantGroup::single(ItemStack::new(recipe.result.as_str(), 1)),
                fuel: Some(VariantGroup::single(ItemStack::new(fuel, fuel_needed))),
                children: VariantGroup::default(),
                context: Some(node_ctx.snapshot()),
            };

            let input_short = remaining - node_ctx.inventory.remove(&recipe.input, remaining);
            let fuel_short = fuel_needed - node_ctx.inventory.remove(fuel, fuel_needed);

            inject_workstation_dependency(builder, &mut node.children, FURNACE, &mut node_ctx);
            request_shortfall(builder, &mut node.children, &mut node_ctx, &recipe.input, input_short);
            request_shortfall(builder, &mut node.children, &mut node_ctx, fuel, fuel_short);

            nodes.push(TreeNode::Smelt(node));
        }
    }
    nodes
}
