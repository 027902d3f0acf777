//! Tool tiers, tool kinds and persistent (non-consumed) items.

use serde::{Deserialize, Serialize};

use crate::types::{name_suffix, CRAFTING_TABLE, FURNACE};

/// Material tier of a tool, ordered from worst to best.
///
/// Gold sits between wood and stone: it mines what wood mines and nothing
/// more, so it never satisfies a stone requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMaterial {
    Wooden,
    Golden,
    Stone,
    Iron,
    Diamond,
    Netherite,
}

impl ToolMaterial {
    /// Parse the material prefix of a tool name.
    pub fn from_tool_name(name: &str) -> Option<Self> {
        let prefix = name.split('_').next()?;
        match prefix {
            "wooden" => Some(Self::Wooden),
            "golden" => Some(Self::Golden),
            "stone" => Some(Self::Stone),
            "iron" => Some(Self::Iron),
            "diamond" => Some(Self::Diamond),
            "netherite" => Some(Self::Netherite),
            _ => None,
        }
    }

    /// Numeric rank (wood 0, gold 0.5, stone 1, iron 2, diamond 3, netherite 4).
    pub fn rank(&self) -> f32 {
        match self {
            Self::Wooden => 0.0,
            Self::Golden => 0.5,
            Self::Stone => 1.0,
            Self::Iron => 2.0,
            Self::Diamond => 3.0,
            Self::Netherite => 4.0,
        }
    }
}

/// Kind of tool, taken from the name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Pickaxe,
    Axe,
    Shovel,
    Sword,
    Hoe,
}

impl ToolKind {
    pub fn from_tool_name(name: &str) -> Option<Self> {
        match name_suffix(name) {
            "pickaxe" => Some(Self::Pickaxe),
            "axe" => Some(Self::Axe),
            "shovel" => Some(Self::Shovel),
            "sword" => Some(Self::Sword),
            "hoe" => Some(Self::Hoe),
            _ => None,
        }
    }
}

/// A parsed tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tool {
    pub kind: ToolKind,
    pub material: ToolMaterial,
}

impl Tool {
    /// Parse `<material>_<kind>` tool names.
    pub fn parse(name: &str) -> Option<Self> {
        Some(Self {
            kind: ToolKind::from_tool_name(name)?,
            material: ToolMaterial::from_tool_name(name)?,
        })
    }

    /// True if `self` can stand in wherever `required` is needed.
    pub fn satisfies(&self, required: &Tool) -> bool {
        self.kind == required.kind && self.material >= required.material
    }
}

/// True if owning `owned` makes crafting `required` unnecessary.
///
/// Names that do not parse as tools only match exactly.
pub fn tool_satisfies(owned: &str, required: &str) -> bool {
    if owned == required {
        return true;
    }
    match (Tool::parse(owned), Tool::parse(required)) {
        (Some(owned), Some(required)) => owned.satisfies(&required),
        _ => false,
    }
}

/// Workstations and tools are not consumed by use.
pub fn is_persistent_item(name: &str) -> bool {
    name == CRAFTING_TABLE || name == FURNACE || Tool::parse(name).is_some() || name == "shears"
}
