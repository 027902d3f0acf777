//! Post-build availability filter.
//!
//! After the tree is built, some craft variants turn out to depend on
//! ingredients that nothing below them can produce (typically because the
//! world budget pruned every source). This pass removes those variants and
//! the subtrees left without a way to succeed. Availability only propagates
//! one level up per pass, so the pass repeats until the tree stops changing.

use std::collections::BTreeSet;

use craftplan_core::{CraftNode, TreeNode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::grouping::same_family;

/// Upper bound on filter passes.
pub const MAX_FILTER_PASSES: usize = 10;

/// Outcome of [`filter_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Passes run, including the one that confirmed convergence.
    pub passes: usize,

    /// False if the pass cap was hit while the tree was still changing.
    pub converged: bool,

    /// Craft variants removed across all passes.
    pub variants_removed: usize,

    /// Child subtrees removed across all passes.
    pub nodes_pruned: usize,
}

#[derive(Debug, Default)]
struct PassStats {
    variants_removed: usize,
    nodes_pruned: usize,
}

/// Run the filter on `root` until it reaches a fixed point or the pass cap.
pub fn filter_tree(root: &mut TreeNode) -> FilterReport {
    let mut report = FilterReport::default();
    let mut before = root.fingerprint();

    while report.passes < MAX_FILTER_PASSES {
        let mut stats = PassStats::default();
        filter_node(root, &mut stats);
        report.passes += 1;
        report.variants_removed += stats.variants_removed;
        report.nodes_pruned += stats.nodes_pruned;

        let after = root.fingerprint();
        if after == before {
            report.converged = true;
            break;
        }
        before = after;
    }

    if report.converged {
        info!(
            passes = report.passes,
            variants_removed = report.variants_removed,
            nodes_pruned = report.nodes_pruned,
            "post-build filter converged"
        );
    } else {
        warn!(passes = report.passes, "post-build filter hit its pass cap");
    }
    report
}

/// Run exactly one filter pass. Returns true if the tree changed.
pub fn filter_once(root: &mut TreeNode) -> bool {
    let mut stats = PassStats::default();
    filter_node(root, &mut stats);
    stats.variants_removed > 0 || stats.nodes_pruned > 0
}

/// A node that can still succeed.
pub fn is_viable(node: &TreeNode) -> bool {
    match node {
        TreeNode::Root(root) => !root.children.is_empty(),
        TreeNode::Craft(craft) => !craft.result.is_empty(),
        TreeNode::Mine(_) | TreeNode::Smelt(_) | TreeNode::Hunt(_) => true,
    }
}

/// Items the subtree at `node` can produce, judged bottom-up.
pub fn available_items(node: &TreeNode) -> BTreeSet<String> {
    match node {
        TreeNode::Root(root) => root.children.values().flat_map(available_items).collect(),
        TreeNode::Craft(craft) => craft.result.values().map(|s| s.name.clone()).collect(),
        TreeNode::Smelt(smelt) => smelt.result.values().map(|s| s.name.clone()).collect(),
        TreeNode::Mine(mine) => mine.target_item.values().cloned().collect(),
        TreeNode::Hunt(hunt) => hunt.target_item.values().cloned().collect(),
    }
}

fn filter_node(node: &mut TreeNode, stats: &mut PassStats) {
    for child in node.children_mut().values_mut() {
        filter_node(child, stats);
    }

    let children = node.children_mut();
    let before = children.len();
    children.retain(is_viable);
    stats.nodes_pruned += before - children.len();

    if let TreeNode::Craft(craft) = node {
        stats.variants_removed += prune_craft_variants(craft);
    }
    node.simplify_variants();
}

/// Drop result/ingredient variant pairs with an unreachable ingredient.
/// Returns how many variants were removed.
fn prune_craft_variants(craft: &mut CraftNode) -> usize {
    // A missing snapshot counts as an empty inventory.
    let mut available: BTreeSet<String> = craft
        .context
        .as_ref()
        .map(|ctx| {
            ctx.inventory
                .iter()
                .filter(|(_, count)| *count > 0)
                .map(|(name, _)| name.to_string())
                .collect()
        })
        .unwrap_or_default();
    for child in craft.children.values() {
        available.extend(available_items(child));
    }

    let reachable = |name: &str| available.iter().any(|item| same_family(item, name));
    let mut any_reachable = false;
    let keep: Vec<bool> = craft
        .ingredients
        .values()
        .map(|stacks| {
            any_reachable |= stacks.iter().any(|s| reachable(&s.name));
            stacks.iter().all(|s| reachable(&s.name))
        })
        .collect();

    let before = craft.result.len();
    if !any_reachable {
        craft.result.clear();
        craft.ingredients.clear();
        return before;
    }
    craft.result.retain_indices(|i| keep.get(i).copied().unwrap_or(false));
    craft.ingredients.retain_indices(|i| keep.get(i).copied().unwrap_or(false));
    before - craft.result.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_core::{
        Inventory, ItemStack, MineNode, NodeContext, Operator, RootNode, VariantGroup, VariantMode,
    };

    fn mine(block: &str, item: &str) -> TreeNode {
        TreeNode::Mine(MineNode {
            operator: Operator::And,
            variant_mode: None,
            what: VariantGroup::single(block.to_string()),
            count: 1,
            target_item: VariantGroup::single(item.to_string()),
            tool: None,
            children: VariantGroup::default(),
            context: None,
        })
    }

    fn root(item: &str, children: Vec<TreeNode>) -> TreeNode {
        let mut root = RootNode::new(VariantGroup::single(item.to_string()), 1, NodeContext::default());
        root.variant_mode = None;
        for child in children {
            root.children.push(child);
        }
        TreeNode::Root(root)
    }

    fn craft(results: &[(&str, &str)], children: Vec<TreeNode>, inventory: Inventory) -> TreeNode {
        TreeNode::Craft(CraftNode {
            operator: Operator::And,
            variant_mode: Some(VariantMode::OneOf),
            what: VariantGroup::single("inventory".to_string()),
            count: 1,
            result: VariantGroup::one_of(results.iter().map(|(r, _)| ItemStack::new(*r, 4))),
            ingredients: VariantGroup::one_of(results.iter().map(|(_, i)| vec![ItemStack::new(*i, 1)])),
            children: VariantGroup::from_values(VariantMode::OneOf, children),
            context: Some(NodeContext {
                inventory,
                ..NodeContext::default()
            }),
        })
    }

    #[test]
    fn test_unreachable_variant_is_dropped_in_alignment() {
        let logs = root("oak_log", vec![mine("oak_log", "oak_log")]);
        let mut node = craft(
            &[("iron_ingot", "raw_iron"), ("oak_planks", "oak_log")],
            vec![logs],
            Inventory::new(),
        );
        let report = filter_tree(&mut node);
        assert!(report.converged);
        assert_eq!(report.variants_removed, 1);

        let TreeNode::Craft(craft) = &node else { panic!("expected craft") };
        assert_eq!(craft.result.first().map(|s| s.name.as_str()), Some("oak_planks"));
        assert_eq!(craft.ingredients.first().unwrap()[0].name, "oak_log");
        assert_eq!(craft.variant_mode, None);
    }

    #[test]
    fn test_inventory_snapshot_counts_as_available() {
        let mut node = craft(
            &[("spruce_planks", "spruce_log")],
            vec![],
            Inventory::from_pairs([("oak_log", 1)]),
        );
        filter_tree(&mut node);
        // same wood family
        assert_eq!(node.variant_count(), 1);
    }

    #[test]
    fn test_nothing_reachable_clears_node_and_prunes_parent() {
        let empty = root("raw_iron", vec![]);
        let ingots = craft(&[("iron_nugget", "raw_iron")], vec![empty], Inventory::new());
        let mut top = root("iron_nugget", vec![ingots]);

        let report = filter_tree(&mut top);
        assert!(report.converged);
        assert!(top.is_empty_root());
        assert_eq!(report.nodes_pruned, 2);
    }

    #[test]
    fn test_three_level_chain_needs_several_passes() {
        let logs = root("oak_log", vec![]);
        let planks = root("oak_planks", vec![craft(&[("oak_planks", "oak_log")], vec![logs], Inventory::new())]);
        let sticks = root("stick", vec![craft(&[("stick", "oak_planks")], vec![planks], Inventory::new())]);
        let mut top = root("torch", vec![craft(&[("torch", "stick")], vec![sticks], Inventory::new())]);

        let report = filter_tree(&mut top);
        assert!(report.converged);
        assert!(report.passes < MAX_FILTER_PASSES);
        assert!(top.is_empty_root());
    }

    #[test]
    fn test_converged_tree_is_stable() {
        let logs = root("oak_log", vec![mine("oak_log", "oak_log")]);
        let mut node = craft(&[("oak_planks", "oak_log"), ("iron_ingot", "raw_iron")], vec![logs], Inventory::new());
        filter_tree(&mut node);
        let fingerprint = node.fingerprint();
        assert!(!filter_once(&mut node));
        assert_eq!(node.fingerprint(), fingerprint);
    }
}
