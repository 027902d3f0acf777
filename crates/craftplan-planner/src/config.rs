//! Planner configuration.

use serde::{Deserialize, Serialize};

/// Configuration for tree building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Mine with the weakest tool that can harvest a block instead of the
    /// best tool already owned.
    pub prefer_minimal_tools: bool,

    /// Tool that must never be required for mining.
    pub avoid_tool: Option<String>,

    /// Maximum recursion depth of root nodes.
    pub max_depth: usize,

    /// Merge structurally identical recipes/resources into variant nodes.
    pub combine_similar_nodes: bool,

    /// Drop mine/hunt sources that the world budget does not expose.
    pub prune_with_world: bool,

    /// Fuel requested for smelting.
    pub fuel: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            prefer_minimal_tools: true,
            avoid_tool: None,
            max_depth: 10,
            combine_similar_nodes: true,
            prune_with_world: false,
            fuel: "coal".to_string(),
        }
    }
}

impl PlannerConfig {
    /// True when the post-build filter should run.
    pub fn runs_post_build_filter(&self) -> bool {
        self.prune_with_world && self.combine_similar_nodes
    }
}
