//! Per-branch build state.

use std::collections::BTreeSet;
use std::sync::Arc;

use craftplan_core::{Inventory, NodeContext, TreeNode, WorldBudget};

use crate::config::PlannerConfig;
use crate::constraints::VariantConstraintManager;

/// State threaded through one branch of the tree.
///
/// Everything here is owned by the branch. Cloning is how a branch forks:
/// OR-alternatives always work on their own clone, AND-siblings share one
/// context sequentially. Only the world budget is shared, and it is never
/// written to.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Items the branch holds.
    pub inventory: Inventory,

    /// Items being resolved on the current path.
    pub visited: BTreeSet<String>,

    /// Depth of the next root built with this context.
    pub depth: usize,

    /// Primary items of every ancestor root.
    pub parent_path: Vec<String>,

    /// Variant commitments inherited from ancestors.
    pub variant_constraints: VariantConstraintManager,

    /// Restrict mine/hunt sources to the world budget.
    pub prune_with_world: bool,

    /// Reachable raw resources.
    pub world_budget: Option<Arc<WorldBudget>>,

    /// Merge structurally identical recipes into variant nodes.
    pub combine_similar_nodes: bool,
}

impl BuildContext {
    /// Fresh top-level context holding `inventory`.
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            combine_similar_nodes: true,
            ..Self::default()
        }
    }

    /// Copy the build flags from `config`.
    pub fn with_config(mut self, config: &PlannerConfig) -> Self {
        self.prune_with_world = config.prune_with_world;
        self.combine_similar_nodes = config.combine_similar_nodes;
        self
    }

    pub fn with_world_budget(mut self, budget: Option<Arc<WorldBudget>>) -> Self {
        self.world_budget = budget;
        self
    }

    pub fn with_constraints(mut self, constraints: VariantConstraintManager) -> Self {
        self.variant_constraints = constraints;
        self
    }

    /// Context for the strategies of a root resolving `items`: one level
    /// deeper, with `items` marked as on the path.
    pub fn descend(&self, items: &[String]) -> Self {
        let mut child = self.clone();
        child.depth += 1;
        child.visited.extend(items.iter().cloned());
        if let Some(primary) = items.first() {
            child.parent_path.push(primary.clone());
        }
        child
    }

    /// True when world pruning is active.
    pub fn prunes_with_world(&self) -> bool {
        self.prune_with_world && self.world_budget.is_some()
    }

    /// Take out of the branch inventory what `subtree` drew from it.
    ///
    /// Every node snapshot records the stock left at that point, so the
    /// lowest count seen anywhere below is what remains. Where the subtree
    /// has alternatives this assumes the hungriest one.
    pub fn consume(&mut self, subtree: &TreeNode) {
        let mut left: Vec<(String, u32)> = self
            .inventory
            .iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        subtree.walk(&mut |node| {
            if let Some(snapshot) = node.context() {
                for (name, count) in left.iter_mut() {
                    *count = (*count).min(snapshot.inventory.get(name));
                }
            }
        });
        for (name, count) in left {
            self.inventory.set(&name, count);
        }
    }

    /// The snapshot stored on nodes built from this context.
    pub fn snapshot(&self) -> NodeContext {
        NodeContext {
            inventory: self.inventory.clone(),
            depth: self.depth,
            parent_path: self.parent_path.clone(),
        }
    }
}
