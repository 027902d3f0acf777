//! # Craftplan Core
//!
//! Core data model and game data for craftplan.
//!
//! This crate provides the fundamental building blocks:
//! - [`VariantGroup`] - one decision over interchangeable alternatives
//! - [`TreeNode`] - AND/OR acquisition tree
//! - [`ActionStep`] - linear plan steps
//! - [`GameData`] / [`DataRegistry`] - per-version recipes, blocks and loot
//! - [`Inventory`] / [`WorldBudget`] - what the agent holds and can reach
//! - [`CraftplanError`] - error types

pub mod catalog;
pub mod data;
pub mod error;
pub mod inventory;
pub mod node;
pub mod registry;
pub mod step;
pub mod tools;
pub mod types;
pub mod variant;
pub mod world;

// Re-exports for convenience
pub use data::{Block, GameData, GameDataDefinition, Item, LootDrop, Recipe, RecipeShape};
pub use error::{CraftplanError, Result};
pub use inventory::Inventory;
pub use node::{CraftNode, HuntNode, MineNode, NodeContext, RootNode, SmeltNode, TreeNode};
pub use registry::DataRegistry;
pub use step::{ActionPath, ActionStep};
pub use types::*;
pub use variant::{Variant, VariantGroup, VariantMode};
pub use world::{ResourceKind, WorldBudget};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{CraftplanError, Result};
    pub use crate::inventory::Inventory;
    pub use crate::node::TreeNode;
    pub use crate::step::{ActionPath, ActionStep};
    pub use crate::types::{ActionKind, ItemStack, Operator};
    pub use crate::variant::{VariantGroup, VariantMode};
    pub use crate::world::WorldBudget;
}
