//! Recursive tree orchestration.

use craftplan_core::tools::is_persistent_item;
use craftplan_core::{GameData, RootNode, TreeNode};
use tracing::{debug, trace};

use crate::builders::{
    build_craft_nodes, build_hunt_nodes, build_mine_nodes, build_smelt_nodes, AcquisitionBuilder,
};
use crate::config::PlannerConfig;
use crate::context::BuildContext;
use crate::grouping::RecipeAlternatives;
use crate::variants::{add_variant_constraint, resolve_variants_for_item};

/// Builds acquisition trees over one dataset and configuration.
///
/// Holds the per-build alternatives cache, so a builder is meant to be used
/// for one top-level build and dropped.
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    data: &'a GameData,
    config: &'a PlannerConfig,
    alternatives: RecipeAlternatives,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(data: &'a GameData, config: &'a PlannerConfig) -> Self {
        Self {
            data,
            config,
            alternatives: RecipeAlternatives::new(),
        }
    }

    /// Build the tree for `count` units of `item`.
    pub fn build(&self, item: &str, count: u32, ctx: &BuildContext) -> TreeNode {
        TreeNode::Root(self.build_recipe_tree(&[item.to_string()], count, ctx))
    }
}

fn finish(mut root: RootNode) -> RootNode {
    if root.what.len() <= 1 {
        root.variant_mode = None;
    }
    root
}

impl AcquisitionBuilder for TreeBuilder<'_> {
    fn data(&self) -> &GameData {
        self.data
    }

    fn config(&self) -> &PlannerConfig {
        self.config
    }

    fn alternatives(&self) -> &RecipeAlternatives {
        &self.alternatives
    }

    fn build_recipe_tree(&self, items: &[String], count: u32, ctx: &BuildContext) -> RootNode {
        let mut ctx = ctx.clone();

        let resolved = resolve_variants_for_item(items, &ctx);
        add_variant_constraint(&mut ctx, items, &resolved);
        let names: Vec<String> = resolved.values().cloned().collect();

        // Workstations and tools stay visible after the deduction below.
        let persistent: Vec<(String, u32)> = names
            .iter()
            .filter(|name| is_persistent_item(name))
            .map(|name| (name.clone(), ctx.inventory.get(name)))
            .collect();
        let taken = ctx.inventory.take_greedy(&names, count);
        for (name, held) in persistent {
            ctx.inventory.set(&name, held);
        }
        let remaining = count - taken;

        let mut root = RootNode::new(resolved, remaining, ctx.snapshot());

        if remaining == 0 {
            trace!(?names, count, "covered by inventory");
            return finish(root);
        }
        if !names.iter().any(|name| self.data.has_item(name)) {
            debug!(?names, "unknown item");
            return finish(root);
        }
        if let Some(item) = names.iter().find(|name| ctx.visited.contains(*name)) {
            debug!(item = %item, path = ?ctx.parent_path, "item already on path");
            return finish(root);
        }
        if ctx.depth >= self.config.max_depth {
            debug!(?names, depth = ctx.depth, "max depth reached");
            return finish(root);
        }

        let child_ctx = ctx.descend(&names);
        let mode = root.what.mode;
        let strategies = [
            build_craft_nodes(self, &names, mode, remaining, &child_ctx),
            build_smelt_nodes(self, &names, remaining, &child_ctx),
            build_mine_nodes(self, &names, remaining, &child_ctx),
            build_hunt_nodes(self, &names, remaining, &child_ctx),
        ];
        for node in strategies.into_iter().flatten() {
            root.children.push(node);
        }

        finish(root)
    }
}

/// Build the acquisition tree for `count` units of `item`.
pub fn build_recipe_tree(
    data: &GameData,
    config: &PlannerConfig,
    item: &str,
    count: u32,
    ctx: &BuildContext,
) -> TreeNode {
    TreeBuilder::new(data, config).build(item, count, ctx)
}
