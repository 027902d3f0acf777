//! Snapshot of raw resources actually present around the agent.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Kind of world resource a budget query is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A minable block.
    Block,
    /// A huntable mob.
    Entity,
}

/// Ceiling on how many of each block/entity are reachable.
///
/// The builder only queries the budget. Reserving against it happens when a
/// concrete path is executed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldBudget {
    /// Block name to number of reachable blocks.
    #[serde(default)]
    pub blocks: BTreeMap<String, u32>,

    /// Entity name to number of reachable mobs.
    #[serde(default)]
    pub entities: BTreeMap<String, u32>,

    /// Search radius the counts were gathered with.
    #[serde(default)]
    pub distance_threshold: f64,

    /// Blocks seen within the distance threshold. Empty means no restriction.
    #[serde(default)]
    pub allowed_blocks_within_threshold: BTreeSet<String>,

    /// Entities seen within the distance threshold. Empty means no restriction.
    #[serde(default)]
    pub allowed_entities_within_threshold: BTreeSet<String>,
}

impl WorldBudget {
    /// Create an empty budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` reachable blocks of `name`.
    pub fn with_block(mut self, name: impl Into<String>, count: u32) -> Self {
        self.blocks.insert(name.into(), count);
        self
    }

    /// Record `count` reachable mobs of `name`.
    pub fn with_entity(mut self, name: impl Into<String>, count: u32) -> Self {
        self.entities.insert(name.into(), count);
        self
    }

    /// Set the search radius and the names seen within it.
    pub fn with_threshold(
        mut self,
        distance: f64,
        blocks: impl IntoIterator<Item = String>,
        entities: impl IntoIterator<Item = String>,
    ) -> Self {
        self.distance_threshold = distance;
        self.allowed_blocks_within_threshold = blocks.into_iter().collect();
        self.allowed_entities_within_threshold = entities.into_iter().collect();
        self
    }

    /// Number of `name` resources of `kind` in the budget.
    pub fn count(&self, kind: ResourceKind, name: &str) -> u32 {
        let counts = match kind {
            ResourceKind::Block => &self.blocks,
            ResourceKind::Entity => &self.entities,
        };
        counts.get(name).copied().unwrap_or(0)
    }

    /// Whether `amount` units of `name` could be gathered.
    pub fn can(&self, kind: ResourceKind, name: &str, amount: u32) -> bool {
        let allowed = match kind {
            ResourceKind::Block => &self.allowed_blocks_within_threshold,
            ResourceKind::Entity => &self.allowed_entities_within_threshold,
        };
        if !allowed.is_empty() && !allowed.contains(name) {
            return false;
        }
        self.count(kind, name) >= amount.max(1)
    }
}
