//! Workstation and tool prerequisites.
//!
//! A prerequisite subtree is attached only when the branch inventory or a
//! root already present below the node covers it. An ancestor that is still
//! building the item does not count: it cannot be used before it exists.

use craftplan_core::tools::tool_satisfies;
use craftplan_core::{TreeNode, VariantGroup};
use tracing::debug;

use crate::builders::AcquisitionBuilder;
use crate::context::BuildContext;

/// True if some root below `children` asks for an item matching `matches`
/// first.
fn has_descendant_root(children: &VariantGroup<TreeNode>, matches: impl Fn(&str) -> bool) -> bool {
    children.values().any(|child| {
        !child
            .find_all(|node| {
                node.as_root()
                    .and_then(|root| root.primary_item())
                    .is_some_and(&matches)
            })
            .is_empty()
    })
}

/// Attach a subtree for `workstation` unless it is already covered.
/// Whatever the subtree draws from the inventory is taken out of `ctx`, so
/// later siblings see only what is left. Returns true when a subtree was
/// attached.
pub fn inject_workstation_dependency(
    builder: &dyn AcquisitionBuilder,
    children: &mut VariantGroup<TreeNode>,
    workstation: &str,
    ctx: &mut BuildContext,
) -> bool {
    if ctx.inventory.has(workstation) {
        debug!(workstation, "workstation already held");
        return false;
    }
    if has_descendant_root(children, |name| name == workstation) {
        return false;
    }

    let root = TreeNode::Root(builder.build_recipe_tree(&[workstation.to_string()], 1, ctx));
    ctx.consume(&root);
    children.push(root);
    true
}

/// Attach a subtree for `tool` unless an equal or better tool of the same
/// kind is held or already requested below.
/// Returns true when a subtree was attached.
pub fn inject_tool_dependency(
    builder: &dyn AcquisitionBuilder,
    children: &mut VariantGroup<TreeNode>,
    tool: &str,
    ctx: &BuildContext,
) -> bool {
    if let Some(owned) = ctx.inventory.names().find(|owned| tool_satisfies(owned, tool)) {
        debug!(tool, owned, "owned tool satisfies requirement");
        return false;
    }
    if has_descendant_root(children, |name| tool_satisfies(name, tool)) {
        return false;
    }

    let root = builder.build_recipe_tree(&[tool.to_string()], 1, ctx);
    children.push(TreeNode::Root(root));
    true
}
