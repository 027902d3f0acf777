//! Built-in overworld dataset.
//!
//! A compact slice of vanilla survival progression: wood species, the stone
//! family, the iron chain, pickaxe tiers, furnace and a handful of mobs.
//! Recipes are expanded per material the way extracted game data ships them
//! (one raw recipe per species, mixed-species combinations included).

use std::collections::BTreeMap;

use crate::data::{
    Block, BlockDrop, GameData, GameDataDefinition, Item, LootDrop, Recipe, SmeltingRecipe,
};
use crate::types::ItemId;

/// Version string of the built-in dataset.
pub const BUILTIN_VERSION: &str = "1.20.4";

/// Wood species covered by the dataset (log/planks pairs).
pub const WOOD_SPECIES: &[(&str, &str)] = &[
    ("oak_log", "oak_planks"),
    ("spruce_log", "spruce_planks"),
    ("birch_log", "birch_planks"),
    ("crimson_stem", "crimson_planks"),
];

const STONE_MATERIALS: &[&str] = &["cobblestone", "cobbled_deepslate", "blackstone"];

const ANY_PICKAXE: &[&str] = &[
    "wooden_pickaxe",
    "golden_pickaxe",
    "stone_pickaxe",
    "iron_pickaxe",
    "diamond_pickaxe",
    "netherite_pickaxe",
];

const STONE_PICKAXE_OR_BETTER: &[&str] = &[
    "stone_pickaxe",
    "iron_pickaxe",
    "diamond_pickaxe",
    "netherite_pickaxe",
];

const IRON_PICKAXE_OR_BETTER: &[&str] = &["iron_pickaxe", "diamond_pickaxe", "netherite_pickaxe"];

/// Incremental builder for a [`GameDataDefinition`] that allocates item ids
/// by name.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    items: Vec<Item>,
    ids: BTreeMap<String, ItemId>,
    recipes: Vec<Recipe>,
    blocks: Vec<Block>,
    entity_loot: BTreeMap<String, Vec<LootDrop>>,
    smelting: Vec<SmeltingRecipe>,
    fuels: BTreeMap<String, f64>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `name`, registering the item on first use.
    pub fn item(&mut self, name: &str) -> ItemId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = self.items.len() as ItemId + 1;
        self.items.push(Item {
            id,
            name: name.to_string(),
            stack_size: 64,
        });
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Register items that have no recipe, block or loot source.
    pub fn items(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            self.item(name);
        }
        self
    }

    /// Shaped recipe; `""` marks an empty cell.
    pub fn shaped(&mut self, rows: &[&[&str]], result: &str, count: u32) -> &mut Self {
        let mut grid = Vec::with_capacity(rows.len());
        for row in rows {
            let mut cells = Vec::with_capacity(row.len());
            for cell in row.iter() {
                cells.push(if cell.is_empty() { None } else { Some(self.item(cell)) });
            }
            grid.push(cells);
        }
        let result = self.item(result);
        self.recipes.push(Recipe::shaped(grid, result, count));
        self
    }

    pub fn shapeless(&mut self, ingredients: &[&str], result: &str, count: u32) -> &mut Self {
        let mut ids = Vec::with_capacity(ingredients.len());
        for name in ingredients {
            ids.push(self.item(name));
        }
        let result = self.item(result);
        self.recipes.push(Recipe::shapeless(ids, result, count));
        self
    }

    /// Block dropping `count` of `drop`; `tools = None` means hand-minable.
    pub fn block(&mut self, name: &str, drop: &str, count: u32, tools: Option<&[&str]>) -> &mut Self {
        self.item(drop);
        self.blocks.push(Block {
            name: name.to_string(),
            drops: vec![BlockDrop {
                item: drop.to_string(),
                count,
            }],
            harvest_tools: tools.map(|t| t.iter().map(|s| s.to_string()).collect()),
        });
        self
    }

    pub fn loot(&mut self, mob: &str, item: &str, min: u32, max: u32, chance: f64) -> &mut Self {
        self.item(item);
        self.entity_loot
            .entry(mob.to_string())
            .or_default()
            .push(LootDrop {
                item: item.to_string(),
                min,
                max,
                chance,
            });
        self
    }

    pub fn smelt(&mut self, input: &str, result: &str) -> &mut Self {
        self.item(input);
        self.item(result);
        self.smelting.push(SmeltingRecipe {
            input: input.to_string(),
            result: result.to_string(),
        });
        self
    }

    pub fn fuel(&mut self, name: &str, smelts_per_unit: f64) -> &mut Self {
        self.item(name);
        self.fuels.insert(name.to_string(), smelts_per_unit);
        self
    }

    /// Finish into a serializable definition.
    pub fn definition(self, version: &str) -> GameDataDefinition {
        GameDataDefinition {
            version: version.to_string(),
            items: self.items,
            recipes: self.recipes,
            blocks: self.blocks,
            entity_loot: self.entity_loot,
            smelting: self.smelting,
            fuels: self.fuels,
        }
    }

    /// Finish into indexed game data.
    pub fn build(self, version: &str) -> GameData {
        GameData::new(self.definition(version))
    }
}

/// The built-in dataset.
pub fn overworld() -> GameData {
    let mut c = CatalogBuilder::new();
    let planks: Vec<&str> = WOOD_SPECIES.iter().map(|(_, p)| *p).collect();

    // Wood
    for &(log, plank) in WOOD_SPECIES {
        c.shapeless(&[log], plank, 4);
        c.block(log, log, 1, None);
    }
    for &a in &planks {
        for &b in &planks {
            c.shaped(&[&[a], &[b]], "stick", 4);
        }
    }
    c.shaped(&[&["bamboo"], &["bamboo"]], "stick", 1);
    c.block("bamboo", "bamboo", 1, None);
    for &p in &planks {
        c.shaped(&[&[p, p], &[p, p]], "crafting_table", 1);
        c.shaped(&[&[p, p, p], &[p, "", p], &[p, p, p]], "chest", 1);
        c.shaped(&[&[p, p, p], &["", "stick", ""], &["", "stick", ""]], "wooden_pickaxe", 1);
        c.shaped(&[&[p, p], &[p, "stick"], &["", "stick"]], "wooden_axe", 1);
    }

    // Stone family
    for &s in STONE_MATERIALS {
        c.shaped(&[&[s, s, s], &[s, "", s], &[s, s, s]], "furnace", 1);
        c.shaped(&[&[s, s, s], &["", "stick", ""], &["", "stick", ""]], "stone_pickaxe", 1);
    }
    c.block("stone", "cobblestone", 1, Some(ANY_PICKAXE));
    c.block("cobblestone", "cobblestone", 1, Some(ANY_PICKAXE));
    c.block("deepslate", "cobbled_deepslate", 1, Some(ANY_PICKAXE));
    c.block("cobbled_deepslate", "cobbled_deepslate", 1, Some(ANY_PICKAXE));
    c.block("blackstone", "blackstone", 1, Some(ANY_PICKAXE));
    c.smelt("cobblestone", "stone");
    c.smelt("sand", "glass");
    c.block("sand", "sand", 1, None);

    // Coal
    c.block("coal_ore", "coal", 1, Some(ANY_PICKAXE));
    c.block("deepslate_coal_ore", "coal", 1, Some(ANY_PICKAXE));
    let coal_row = ["coal"; 3];
    c.shaped(&[&coal_row, &coal_row, &coal_row], "coal_block", 1);
    c.shapeless(&["coal_block"], "coal", 9);
    for &(log, _) in WOOD_SPECIES {
        c.smelt(log, "charcoal");
    }
    c.shaped(&[&["coal"], &["stick"]], "torch", 4);
    c.shaped(&[&["charcoal"], &["stick"]], "torch", 4);

    // Iron
    c.block("iron_ore", "raw_iron", 1, Some(STONE_PICKAXE_OR_BETTER));
    c.block("deepslate_iron_ore", "raw_iron", 1, Some(STONE_PICKAXE_OR_BETTER));
    c.smelt("raw_iron", "iron_ingot");
    let nugget_row = ["iron_nugget"; 3];
    c.shaped(&[&nugget_row, &nugget_row, &nugget_row], "iron_ingot", 1);
    c.shapeless(&["iron_ingot"], "iron_nugget", 9);
    let ingot_row = ["iron_ingot"; 3];
    c.shaped(&[&ingot_row, &ingot_row, &ingot_row], "iron_block", 1);
    c.shapeless(&["iron_block"], "iron_ingot", 9);
    c.shaped(
        &[&["iron_ingot", "iron_ingot", "iron_ingot"], &["", "stick", ""], &["", "stick", ""]],
        "iron_pickaxe",
        1,
    );

    // Diamond
    c.block("diamond_ore", "diamond", 1, Some(IRON_PICKAXE_OR_BETTER));
    c.shaped(
        &[&["diamond", "diamond", "diamond"], &["", "stick", ""], &["", "stick", ""]],
        "diamond_pickaxe",
        1,
    );

    // Paper and books
    c.block("sugar_cane", "sugar_cane", 1, None);
    c.shaped(&[&["sugar_cane", "sugar_cane", "sugar_cane"]], "paper", 3);
    c.shapeless(&["paper", "paper", "paper", "leather"], "book", 1);

    // Mobs
    c.loot("cow", "leather", 0, 2, 1.0);
    c.loot("cow", "beef", 1, 3, 1.0);
    c.loot("sheep", "white_wool", 1, 1, 1.0);
    c.loot("sheep", "mutton", 1, 2, 1.0);
    c.loot("spider", "string", 0, 2, 1.0);
    c.loot("spider", "spider_eye", 0, 1, 0.33);
    c.loot("zombie", "rotten_flesh", 0, 2, 1.0);
    c.loot("zombie", "iron_ingot", 1, 1, 0.025);
    c.shaped(&[&["string", "string"], &["string", "string"]], "white_wool", 1);

    // Fuels
    c.fuel("coal", 8.0);
    c.fuel("charcoal", 8.0);
    c.fuel("coal_block", 80.0);
    for &p in &planks {
        c.fuel(p, 1.5);
    }
    c.fuel("stick", 0.5);

    c.items(&["golden_pickaxe", "netherite_pickaxe", "gold_ingot"]);
    c.build(BUILTIN_VERSION)
}
