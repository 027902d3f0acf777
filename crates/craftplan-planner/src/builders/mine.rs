//! Mine strategy.

use std::collections::BTreeSet;

use craftplan_core::tools::ToolMaterial;
use craftplan_core::{
    Block, Inventory, MineNode, Operator, ResourceKind, TreeNode, VariantGroup, VariantMode,
};
use serde_json::json;
use tracing::debug;

use super::{ceil_div, AcquisitionBuilder};
use crate::config::PlannerConfig;
use crate::context::BuildContext;
use crate::dependencies::inject_tool_dependency;
use crate::variants::filter_resource_variants;

/// Tool group of blocks that need no particular tool.
pub const ANY_TOOL: &str = "any";

/// A block that drops one of the requested items.
#[derive(Debug, Clone, Copy)]
struct Source<'a> {
    block: &'a Block,
    item: &'a str,
    drop_count: u32,
}

fn tier(tool: &str) -> (bool, Option<ToolMaterial>) {
    let material = ToolMaterial::from_tool_name(tool);
    (material.is_none(), material)
}

/// Tool to mine `block` with, [`ANY_TOOL`] when none is needed, or `None`
/// when every tool that harvests it is avoided.
pub fn select_tool(block: &Block, config: &PlannerConfig, inventory: &Inventory) -> Option<String> {
    let tools = match &block.harvest_tools {
        Some(tools) if !tools.is_empty() => tools,
        _ => return Some(ANY_TOOL.to_string()),
    };
    let permitted: Vec<&String> = tools
        .iter()
        .filter(|tool| config.avoid_tool.as_deref() != Some(tool.as_str()))
        .collect();

    if !config.prefer_minimal_tools {
        let best_owned = permitted
            .iter()
            .filter(|tool| inventory.has(tool.as_str()))
            .max_by_key(|tool| ToolMaterial::from_tool_name(tool));
        if let Some(tool) = best_owned {
            return Some(tool.to_string());
        }
    }
    permitted
        .into_iter()
        .min_by_key(|tool| tier(tool))
        .cloned()
}

/// Build mine leaves yielding `remaining` units of any of `targets`.
///
/// Blocks are grouped by the tool they need, narrowed to what the world
/// offers, and blocks with the same drop count inside a tool group share one
/// leaf.
pub fn build_mine_nodes(
    builder: &dyn AcquisitionBuilder,
    targets: &[String],
    remaining: u32,
    ctx: &BuildContext,
) -> Vec<TreeNode> {
    let data = builder.data();
    let config = builder.config();

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut by_tool: Vec<(String, Vec<Source<'_>>)> = Vec::new();
    for target in targets {
        for block in data.blocks_dropping(target) {
            if !seen.insert(block.name.as_str()) {
                continue;
            }
            let Some(tool) = select_tool(block, config, &ctx.inventory) else {
                debug!(block = %block.name, "every harvesting tool is avoided");
                continue;
            };
            let source = Source {
                block,
                item: target,
                drop_count: block.drop_count(target).unwrap_or(1).max(1),
            };
            match by_tool.iter_mut().find(|(t, _)| *t == tool) {
                Some((_, sources)) => sources.push(source),
                None => by_tool.push((tool, vec![source])),
            }
        }
    }

    let mut nodes = Vec::new();
    for (tool, sources) in by_tool {
        let names: Vec<String> = sources.iter().map(|s| s.block.name.clone()).collect();
        let available = filter_resource_variants(ctx, ResourceKind::Block, &names);
        if available.is_empty() {
            debug!(tool = %tool, "no reachable blocks for tool group");
            continue;
        }

        let mut clusters: Vec<(u32, Vec<Source<'_>>)> = Vec::new();
        for source in sources.into_iter().filter(|s| available.contains(&s.block.name)) {
            match clusters.iter_mut().find(|(count, _)| *count == source.drop_count) {
                Some((_, members)) => members.push(source),
                None => clusters.push((source.drop_count, vec![source])),
            }
        }

        for (drop_count, members) in clusters {
            nodes.push(mine_leaf(builder, &tool, drop_count, &members, remaining, ctx));
        }
    }
    nodes
}

fn mine_leaf(
    builder: &dyn AcquisitionBuilder,
    tool: &str,
    drop_count: u32,
    members: &[Source<'_>],
    remaining: u32,
    ctx: &BuildContext,
) -> TreeNode {
    let mode = if members.len() > 1 {
        VariantMode::AnyOf
    } else {
        VariantMode::OneOf
    };
    let mut what = VariantGroup::empty(mode);
    let mut target_item = VariantGroup::empty(mode);
    for source in members {
        what.push(source.block.name.clone());
        target_item.push_with_metadata(source.item.to_string(), json!({ "yield": drop_count }));
    }

    let needs_tool = tool != ANY_TOOL;
    let mut node = MineNode {
        operator: Operator::And,
        variant_mode: Some(mode),
        what,
        count: ceil_div(remaining, drop_count),
        target_item,
        tool: needs_tool.then(|| VariantGroup::single(tool.to_string())),
        children: VariantGroup::default(),
        context: Some(ctx.snapshot()),
    };
    if needs_tool {
        inject_tool_dependency(builder, &mut node.children, tool, ctx);
    }

    let mut node = TreeNode::Mine(node);
    node.simplify_variants();
    node
}
