//! Linear action steps consumed by path optimizers and executors.

use serde::{Deserialize, Serialize};

use crate::types::{ActionKind, ItemStack, CRAFTING_TABLE, INVENTORY_GRID};
use crate::variant::{VariantGroup, VariantMode};

/// One concrete action of a linearized plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    pub action: ActionKind,

    /// Workstation (craft/smelt), block (mine) or mob (hunt).
    pub what: VariantGroup<String>,

    /// Number of times the action is performed.
    pub count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<VariantGroup<ItemStack>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<VariantGroup<Vec<ItemStack>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<VariantGroup<ItemStack>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel: Option<VariantGroup<ItemStack>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<VariantGroup<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_item: Option<VariantGroup<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_mode: Option<VariantMode>,
}

/// An ordered list of steps; earlier steps feed later ones.
pub type ActionPath = Vec<ActionStep>;

impl ActionStep {
    fn bare(action: ActionKind, what: VariantGroup<String>, count: u32) -> Self {
        Self {
            action,
            what,
            count,
            result: None,
            ingredients: None,
            input: None,
            fuel: None,
            tool: None,
            target_item: None,
            variant_mode: None,
        }
    }

    /// Mine `count` blocks of `block`, each dropping one `item`.
    pub fn mine(block: &str, item: &str, count: u32) -> Self {
        let mut step = Self::bare(ActionKind::Mine, VariantGroup::single(block.to_string()), count);
        step.target_item = Some(VariantGroup::single(item.to_string()));
        step
    }

    /// Craft `count` times, producing `result` per craft from `ingredients`.
    pub fn craft(result: ItemStack, ingredients: Vec<ItemStack>, count: u32, table: bool) -> Self {
        let station = if table { CRAFTING_TABLE } else { INVENTORY_GRID };
        let mut step = Self::bare(ActionKind::Craft, VariantGroup::single(station.to_string()), count);
        step.result = Some(VariantGroup::single(result));
        step.ingredients = Some(VariantGroup::single(ingredients));
        step
    }

    /// Smelt `count` units of `input` into `result`.
    pub fn smelt(input: &str, result: &str, fuel: Option<ItemStack>, count: u32) -> Self {
        let mut step = Self::bare(
            ActionKind::Smelt,
            VariantGroup::single(crate::types::FURNACE.to_string()),
            count,
        );
        step.input = Some(VariantGroup::single(ItemStack::new(input, 1)));
        step.result = Some(VariantGroup::single(ItemStack::new(result, 1)));
        step.fuel = fuel.map(VariantGroup::single);
        step
    }

    /// Hunt `count` of `mob` for `item`.
    pub fn hunt(mob: &str, item: &str, count: u32) -> Self {
        let mut step = Self::bare(ActionKind::Hunt, VariantGroup::single(mob.to_string()), count);
        step.target_item = Some(VariantGroup::single(item.to_string()));
        step
    }

    /// Require `tool` for this step.
    pub fn with_tool(mut self, tool: &str) -> Self {
        self.tool = Some(VariantGroup::single(tool.to_string()));
        self
    }

    /// Construct a step with every optional field unset.
    pub fn new(action: ActionKind, what: VariantGroup<String>, count: u32) -> Self {
        Self::bare(action, what, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_craft_step_records_station() {
        let step = ActionStep::craft(
            ItemStack::new("stick", 4),
            vec![ItemStack::new("oak_planks", 2)],
            1,
            false,
        );
        assert_eq!(step.what.first().map(String::as_str), Some("inventory"));
        assert!(step.tool.is_none());
    }

    #[test]
    fn test_optional_fields_are_skipped() {
        let json = serde_json::to_value(ActionStep::mine("stone", "cobblestone", 3)).unwrap();
        assert_eq!(json["action"], "mine");
        assert!(json.get("ingredients").is_none());
        assert_eq!(json["target_item"]["variants"][0]["value"], "cobblestone");
    }
}
