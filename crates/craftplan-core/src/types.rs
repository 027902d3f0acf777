//! Common types used across craftplan.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric item identifier from the game data.
pub type ItemId = u32;

/// Name of the workstation needed for larger-than-2x2 recipes.
pub const CRAFTING_TABLE: &str = "crafting_table";

/// Name of the workstation needed for smelting.
pub const FURNACE: &str = "furnace";

/// Placeholder workstation for recipes made in the 2x2 inventory grid.
pub const INVENTORY_GRID: &str = "inventory";

/// An item name with a count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.name, self.count)
    }
}

/// How a node combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Every child is required.
    And,
    /// Any one child suffices.
    Or,
}

/// The acquisition strategy a node or step stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Root,
    Craft,
    Mine,
    Smelt,
    Hunt,
}

impl ActionKind {
    /// True for strategies that have no ingredient inputs of their own.
    pub fn is_gathering(&self) -> bool {
        matches!(self, ActionKind::Mine | ActionKind::Hunt)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Root => "root",
            ActionKind::Craft => "craft",
            ActionKind::Mine => "mine",
            ActionKind::Smelt => "smelt",
            ActionKind::Hunt => "hunt",
        };
        f.write_str(name)
    }
}

/// Last `_`-separated token of an item name (`oak_planks` -> `planks`).
pub fn name_suffix(name: &str) -> &str {
    name.rsplit('_').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_suffix() {
        assert_eq!(name_suffix("dark_oak_planks"), "planks");
        assert_eq!(name_suffix("stick"), "stick");
    }

    #[test]
    fn test_operator_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Operator::And).unwrap(), "\"AND\"");
    }
}
