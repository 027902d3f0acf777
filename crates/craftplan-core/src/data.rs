//! Per-version recipe, block and entity data.
//!
//! [`GameDataDefinition`] is the serializable form (what a data file holds);
//! [`GameData`] wraps it with lookup indexes and is read-only once built.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ItemId;

/// An item known to the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
}

fn default_stack_size() -> u32 {
    64
}

/// Layout of a crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecipeShape {
    /// Grid recipe; `None` cells are empty slots.
    Shaped { rows: Vec<Vec<Option<ItemId>>> },
    /// Position-independent ingredient list.
    Shapeless { ingredients: Vec<ItemId> },
}

/// Output of one crafting operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeResult {
    pub id: ItemId,
    pub count: u32,
}

/// A raw crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipe {
    pub shape: RecipeShape,
    pub result: RecipeResult,
}

impl Recipe {
    /// Shaped recipe from rows of optional item ids.
    pub fn shaped(rows: Vec<Vec<Option<ItemId>>>, result: ItemId, count: u32) -> Self {
        Self {
            shape: RecipeShape::Shaped { rows },
            result: RecipeResult { id: result, count },
        }
    }

    /// Shapeless recipe from an ingredient list.
    pub fn shapeless(ingredients: Vec<ItemId>, result: ItemId, count: u32) -> Self {
        Self {
            shape: RecipeShape::Shapeless { ingredients },
            result: RecipeResult { id: result, count },
        }
    }

    pub fn is_shaped(&self) -> bool {
        matches!(self.shape, RecipeShape::Shaped { .. })
    }

    /// Grid width (shapeless recipes report their slot count).
    pub fn width(&self) -> usize {
        match &self.shape {
            RecipeShape::Shaped { rows } => rows.iter().map(Vec::len).max().unwrap_or(0),
            RecipeShape::Shapeless { ingredients } => ingredients.len(),
        }
    }

    /// Grid height (shapeless recipes report 1).
    pub fn height(&self) -> usize {
        match &self.shape {
            RecipeShape::Shaped { rows } => rows.len(),
            RecipeShape::Shapeless { .. } => 1,
        }
    }

    /// Ingredient ids in slot order, empty cells skipped.
    pub fn ingredient_slots(&self) -> Vec<ItemId> {
        match &self.shape {
            RecipeShape::Shaped { rows } => rows.iter().flatten().flatten().copied().collect(),
            RecipeShape::Shapeless { ingredients } => ingredients.clone(),
        }
    }

    /// Number of occupied ingredient slots.
    pub fn slot_count(&self) -> usize {
        self.ingredient_slots().len()
    }

    /// Needs a crafting table: wider or taller than 2x2, or more than 4 slots.
    pub fn requires_table(&self) -> bool {
        match &self.shape {
            RecipeShape::Shaped { .. } => {
                self.width() > 2 || self.height() > 2 || self.slot_count() > 4
            }
            RecipeShape::Shapeless { .. } => self.slot_count() > 4,
        }
    }

    /// Per-craft count of each distinct ingredient, in first-slot order.
    pub fn ingredient_counts(&self) -> Vec<(ItemId, u32)> {
        let mut counts: Vec<(ItemId, u32)> = Vec::new();
        for id in self.ingredient_slots() {
            match counts.iter_mut().find(|(existing, _)| *existing == id) {
                Some((_, count)) => *count += 1,
                None => counts.push((id, 1)),
            }
        }
        counts
    }

    /// True if `id` appears in any slot.
    pub fn uses(&self, id: ItemId) -> bool {
        self.ingredient_slots().contains(&id)
    }
}

/// An item dropped when a block is broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDrop {
    pub item: String,
    #[serde(default = "default_drop_count")]
    pub count: u32,
}

fn default_drop_count() -> u32 {
    1
}

/// A minable block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub drops: Vec<BlockDrop>,
    /// Tools that harvest the block; `None` means any tool or bare hands.
    #[serde(default)]
    pub harvest_tools: Option<Vec<String>>,
}

impl Block {
    /// Drop count for `item`, if the block drops it.
    pub fn drop_count(&self, item: &str) -> Option<u32> {
        self.drops.iter().find(|d| d.item == item).map(|d| d.count)
    }
}

/// One entry of a mob's loot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootDrop {
    pub item: String,
    #[serde(default = "default_drop_count")]
    pub min: u32,
    #[serde(default = "default_drop_count")]
    pub max: u32,
    #[serde(default = "default_chance")]
    pub chance: f64,
}

fn default_chance() -> f64 {
    1.0
}

impl LootDrop {
    /// Mean number of items one kill yields.
    pub fn expected_per_kill(&self) -> f64 {
        self.chance * f64::from(self.min + self.max) / 2.0
    }
}

/// Furnace conversion of one input item into one result item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmeltingRecipe {
    pub input: String,
    pub result: String,
}

/// Serializable game data for one version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDataDefinition {
    pub version: String,
    pub items: Vec<Item>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub entity_loot: BTreeMap<String, Vec<LootDrop>>,
    #[serde(default)]
    pub smelting: Vec<SmeltingRecipe>,
    /// Fuel item name to number of smelts one unit powers.
    #[serde(default)]
    pub fuels: BTreeMap<String, f64>,
}

/// Indexed, read-only game data.
#[derive(Debug, Clone)]
pub struct GameData {
    definition: GameDataDefinition,
    items_by_name: BTreeMap<String, usize>,
    items_by_id: BTreeMap<ItemId, usize>,
    recipes_by_result: BTreeMap<ItemId, Vec<usize>>,
    blocks_by_name: BTreeMap<String, usize>,
    blocks_by_drop: BTreeMap<String, Vec<usize>>,
    mobs_by_drop: BTreeMap<String, Vec<String>>,
    smelting_by_result: BTreeMap<String, Vec<usize>>,
    conversion_pairs: BTreeSet<(ItemId, ItemId)>,
}

impl GameData {
    /// Index a definition.
    pub fn new(definition: GameDataDefinition) -> Self {
        let items_by_name = definition
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name.clone(), i))
            .collect();
        let items_by_id = definition
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id, i))
            .collect();

        let mut recipes_by_result: BTreeMap<ItemId, Vec<usize>> = BTreeMap::new();
        let mut edges: BTreeSet<(ItemId, ItemId)> = BTreeSet::new();
        for (i, recipe) in definition.recipes.iter().enumerate() {
            recipes_by_result.entry(recipe.result.id).or_default().push(i);
            for (ingredient, _) in recipe.ingredient_counts() {
                edges.insert((recipe.result.id, ingredient));
            }
        }
        // A pair is a direct conversion cycle when each item crafts from the other.
        let conversion_pairs = edges
            .iter()
            .filter(|(result, ingredient)| edges.contains(&(*ingredient, *result)))
            .copied()
            .collect();

        let mut blocks_by_name = BTreeMap::new();
        let mut blocks_by_drop: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, block) in definition.blocks.iter().enumerate() {
            blocks_by_name.insert(block.name.clone(), i);
            for drop in &block.drops {
                blocks_by_drop.entry(drop.item.clone()).or_default().push(i);
            }
        }

        let mut mobs_by_drop: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (mob, loot) in &definition.entity_loot {
            for drop in loot {
                mobs_by_drop.entry(drop.item.clone()).or_default().push(mob.clone());
            }
        }

        let mut smelting_by_result: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, recipe) in definition.smelting.iter().enumerate() {
            smelting_by_result.entry(recipe.result.clone()).or_default().push(i);
        }

        Self {
            definition,
            items_by_name,
            items_by_id,
            recipes_by_result,
            blocks_by_name,
            blocks_by_drop,
            mobs_by_drop,
            smelting_by_result,
            conversion_pairs,
        }
    }

    /// Parse and index a JSON data file.
    pub fn from_json(json: &str) -> Result<Self> {
        let definition: GameDataDefinition = serde_json::from_str(json)?;
        Ok(Self::new(definition))
    }

    pub fn version(&self) -> &str {
        &self.definition.version
    }

    pub fn definition(&self) -> &GameDataDefinition {
        &self.definition
    }

    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items_by_name
            .get(name)
            .and_then(|&i| self.definition.items.get(i))
    }

    pub fn item_by_id(&self, id: ItemId) -> Option<&Item> {
        self.items_by_id
            .get(&id)
            .and_then(|&i| self.definition.items.get(i))
    }

    pub fn item_name(&self, id: ItemId) -> Option<&str> {
        self.item_by_id(id).map(|item| item.name.as_str())
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items_by_name.contains_key(name)
    }

    /// All raw recipes producing `name`.
    pub fn recipes_for(&self, name: &str) -> Vec<&Recipe> {
        let Some(item) = self.item(name) else {
            return Vec::new();
        };
        self.recipes_by_result
            .get(&item.id)
            .map(|indexes| {
                indexes
                    .iter()
                    .filter_map(|&i| self.definition.recipes.get(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks_by_name
            .get(name)
            .and_then(|&i| self.definition.blocks.get(i))
    }

    /// Blocks whose drops include `item`.
    pub fn blocks_dropping(&self, item: &str) -> Vec<&Block> {
        self.blocks_by_drop
            .get(item)
            .map(|indexes| {
                indexes
                    .iter()
                    .filter_map(|&i| self.definition.blocks.get(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Mobs whose loot table includes `item`.
    pub fn mobs_dropping(&self, item: &str) -> Vec<&str> {
        self.mobs_by_drop
            .get(item)
            .map(|mobs| mobs.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn loot(&self, mob: &str) -> Option<&[LootDrop]> {
        self.definition.entity_loot.get(mob).map(Vec::as_slice)
    }

    /// Furnace recipes producing `item`.
    pub fn smelting_inputs_for(&self, item: &str) -> Vec<&SmeltingRecipe> {
        self.smelting_by_result
            .get(item)
            .map(|indexes| {
                indexes
                    .iter()
                    .filter_map(|&i| self.definition.smelting.get(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Smelts powered by one unit of `fuel`.
    pub fn fuel_rate(&self, fuel: &str) -> Option<f64> {
        self.definition.fuels.get(fuel).copied()
    }

    /// True if `result` crafts from `ingredient` and `ingredient` crafts from `result`.
    pub fn is_direct_cycle(&self, result: ItemId, ingredient: ItemId) -> bool {
        self.conversion_pairs.contains(&(result, ingredient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> GameData {
        GameData::new(GameDataDefinition {
            version: "test".to_string(),
            items: vec![
                Item { id: 1, name: "iron_ingot".to_string(), stack_size: 64 },
                Item { id: 2, name: "iron_nugget".to_string(), stack_size: 64 },
                Item { id: 3, name: "stick".to_string(), stack_size: 64 },
                Item { id: 4, name: "oak_planks".to_string(), stack_size: 64 },
            ],
            recipes: vec![
                Recipe::shaped(vec![vec![Some(2); 3]; 3], 1, 1),
                Recipe::shapeless(vec![1], 2, 9),
                Recipe::shaped(vec![vec![Some(4)], vec![Some(4)]], 3, 4),
            ],
            ..GameDataDefinition::default()
        })
    }

    #[test]
    fn test_direct_cycles_are_detected() {
        let data = tiny();
        assert!(data.is_direct_cycle(1, 2));
        assert!(data.is_direct_cycle(2, 1));
        assert!(!data.is_direct_cycle(3, 4));
    }

    #[test]
    fn test_table_requirement_from_shape() {
        let data = tiny();
        let ingot = data.recipes_for("iron_ingot");
        assert!(ingot[0].requires_table());
        let stick = data.recipes_for("stick");
        assert!(!stick[0].requires_table());
        assert_eq!(stick[0].ingredient_counts(), vec![(4, 2)]);
    }

    #[test]
    fn test_unknown_item_has_no_recipes() {
        assert!(tiny().recipes_for("diamond").is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "version": "mini",
            "items": [{"id": 1, "name": "cobblestone"}],
            "blocks": [{"name": "stone", "drops": [{"item": "cobblestone"}], "harvest_tools": ["wooden_pickaxe"]}]
        }"#;
        let data = GameData::from_json(json).unwrap();
        assert_eq!(data.version(), "mini");
        assert_eq!(data.blocks_dropping("cobblestone")[0].name, "stone");
        assert_eq!(data.item("cobblestone").unwrap().stack_size, 64);
    }
}
