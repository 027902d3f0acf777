//! Recipe and resource grouping.
//!
//! Raw game data lists one recipe per material (every wood species, every
//! stone type). The grouper folds those back into decisions: recipes that
//! share a shape become one multi-variant craft node, and ingredients that
//! fill the same slot across those recipes become one ingredient request.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use craftplan_core::{name_suffix, GameData, ItemId, Recipe, RecipeShape};

/// Wood species prefixes folded together by recipe dedup.
pub const WOOD_SPECIES_PREFIXES: &[&str] = &[
    "dark_oak", "oak", "spruce", "birch", "jungle", "acacia", "mangrove", "cherry", "crimson",
    "warped", "pale_oak",
];

/// Suffixes whose members are interchangeable when checking availability.
pub const COMBINABLE_SUFFIXES: &[&str] = &["planks", "log", "wood", "stem", "hyphae", "wool"];

const WOOD_FAMILY_SUFFIXES: &[&str] = &["log", "wood", "stem", "hyphae"];

/// A raw recipe together with the item it produces.
#[derive(Debug, Clone, Copy)]
pub struct RecipeEntry<'a> {
    pub recipe: &'a Recipe,
    pub item_name: &'a str,
    pub item_id: ItemId,
}

impl<'a> RecipeEntry<'a> {
    /// Every raw recipe producing any of `items`, in item then data order.
    pub fn collect<S: AsRef<str>>(data: &'a GameData, items: &[S]) -> Vec<RecipeEntry<'a>> {
        let mut entries = Vec::new();
        for name in items {
            let name = name.as_ref();
            let Some(item) = data.item(name) else {
                continue;
            };
            for recipe in data.recipes_for(name) {
                entries.push(RecipeEntry {
                    recipe,
                    item_name: &item.name,
                    item_id: item.id,
                });
            }
        }
        entries
    }

    /// Items consumed per craft, in first-slot order.
    pub fn ingredients(&self, data: &GameData) -> Vec<(ItemId, String, u32)> {
        self.recipe
            .ingredient_counts()
            .into_iter()
            .filter_map(|(id, count)| data.item_name(id).map(|name| (id, name.to_string(), count)))
            .collect()
    }
}

/// Shape fingerprint of a recipe that ignores concrete materials.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey {
    pub shaped: bool,
    pub requires_table: bool,
    pub result_count: u32,
    pub fingerprint: String,
}

/// Canonical key of `recipe`.
pub fn canonical_key(recipe: &Recipe) -> CanonicalKey {
    let fingerprint = match &recipe.shape {
        RecipeShape::Shaped { rows } => {
            let occupancy: Vec<String> = rows
                .iter()
                .map(|row| row.iter().map(|cell| if cell.is_some() { '#' } else { '.' }).collect())
                .collect();
            format!("{}x{}:{}", recipe.width(), recipe.height(), occupancy.join("/"))
        }
        RecipeShape::Shapeless { ingredients } => format!("n{}", ingredients.len()),
    };
    CanonicalKey {
        shaped: recipe.is_shaped(),
        requires_table: recipe.requires_table(),
        result_count: recipe.result.count,
        fingerprint,
    }
}

/// Last `_` token of `name`, with the wood family folded into `log`.
pub fn suffix_token(name: &str) -> &str {
    let suffix = name_suffix(name);
    if WOOD_FAMILY_SUFFIXES.contains(&suffix) {
        "log"
    } else {
        suffix
    }
}

/// True if `a` and `b` are interchangeable members of a combinable family.
pub fn same_family(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let (sa, sb) = (suffix_token(a), suffix_token(b));
    sa == sb
        && COMBINABLE_SUFFIXES.contains(&name_suffix(a))
        && COMBINABLE_SUFFIXES.contains(&name_suffix(b))
}

/// `name` with any wood species prefix replaced by a placeholder.
fn species_placeholder(name: &str) -> String {
    for prefix in WOOD_SPECIES_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix).and_then(|r| r.strip_prefix('_')) {
            let suffix = suffix_token(rest);
            if WOOD_FAMILY_SUFFIXES.contains(&name_suffix(rest)) || suffix == "planks" {
                return format!("#wood_{}", suffix);
            }
        }
    }
    name.to_string()
}

/// Collapse recipes for the same result that only differ by wood species,
/// keeping the first representative of each.
pub fn dedup_recipes<'a>(data: &GameData, entries: Vec<RecipeEntry<'a>>) -> Vec<RecipeEntry<'a>> {
    let mut seen: BTreeSet<(String, CanonicalKey, Vec<String>)> = BTreeSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            let materials = entry
                .recipe
                .ingredient_slots()
                .into_iter()
                .map(|id| data.item_name(id).map(species_placeholder).unwrap_or_default())
                .collect();
            seen.insert((entry.item_name.to_string(), canonical_key(entry.recipe), materials))
        })
        .collect()
}

/// Group entries by canonical key, keeping first-seen order.
pub fn group_by_canonical_key<'a>(
    entries: Vec<RecipeEntry<'a>>,
) -> Vec<(CanonicalKey, Vec<RecipeEntry<'a>>)> {
    let mut groups: Vec<(CanonicalKey, Vec<RecipeEntry<'a>>)> = Vec::new();
    for entry in entries {
        let key = canonical_key(entry.recipe);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(entry),
            None => groups.push((key, vec![entry])),
        }
    }
    groups
}

/// Key of the ingredient request one recipe slot feeds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoolKey {
    /// Items that fill the same slot across sibling recipes, sorted.
    Alternatives(Vec<String>),
    /// Suffix token of an ingredient without alternatives.
    Suffix(String),
    /// One literal item, used when similar nodes are not combined.
    Item(String),
}

impl PoolKey {
    /// Pool for `ingredient` given its slot alternatives.
    pub fn for_ingredient(ingredient: &str, alternatives: &BTreeSet<String>) -> Self {
        if alternatives.len() > 1 {
            PoolKey::Alternatives(alternatives.iter().cloned().collect())
        } else {
            PoolKey::Suffix(suffix_token(ingredient).to_string())
        }
    }
}

/// Split one canonical group by the ingredient pools its members draw from.
/// `pool_key` yields a member's sorted pool signature.
pub fn split_by_ingredient_pool<'a>(
    group: Vec<RecipeEntry<'a>>,
    mut pool_key: impl FnMut(&RecipeEntry<'a>) -> Vec<PoolKey>,
) -> Vec<Vec<RecipeEntry<'a>>> {
    let mut split: Vec<(Vec<PoolKey>, Vec<RecipeEntry<'a>>)> = Vec::new();
    for entry in group {
        let key = pool_key(&entry);
        match split.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(entry),
            None => split.push((key, vec![entry])),
        }
    }
    split.into_iter().map(|(_, members)| members).collect()
}

/// Per-slot alternatives for recipes of one result and shape.
pub type SlotAlternatives = Rc<Vec<BTreeSet<String>>>;

/// Slot alternative lookup, cached for the lifetime of one build.
#[derive(Debug, Default)]
pub struct RecipeAlternatives {
    cache: RefCell<HashMap<(String, CanonicalKey), SlotAlternatives>>,
}

impl RecipeAlternatives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items seen at each slot across every raw recipe for `result` with `key`.
    pub fn slots(&self, data: &GameData, result: &str, key: &CanonicalKey) -> SlotAlternatives {
        let cache_key = (result.to_string(), key.clone());
        if let Some(slots) = self.cache.borrow().get(&cache_key) {
            return Rc::clone(slots);
        }

        let mut slots: Vec<BTreeSet<String>> = Vec::new();
        for recipe in data.recipes_for(result) {
            if canonical_key(recipe) != *key {
                continue;
            }
            for (i, id) in recipe.ingredient_slots().into_iter().enumerate() {
                if slots.len() <= i {
                    slots.resize_with(i + 1, BTreeSet::new);
                }
                if let Some(name) = data.item_name(id) {
                    slots[i].insert(name.to_string());
                }
            }
        }
        let slots = Rc::new(slots);
        self.cache.borrow_mut().insert(cache_key, Rc::clone(&slots));
        slots
    }

    /// Alternatives for `ingredient` in `entry`, the ingredient included.
    pub fn for_ingredient(&self, data: &GameData, entry: &RecipeEntry<'_>, ingredient: &str) -> BTreeSet<String> {
        let key = canonical_key(entry.recipe);
        let slots = self.slots(data, entry.item_name, &key);
        let mut alternatives = BTreeSet::new();
        for (i, id) in entry.recipe.ingredient_slots().into_iter().enumerate() {
            if data.item_name(id) == Some(ingredient) {
                if let Some(slot) = slots.get(i) {
                    alternatives.extend(slot.iter().cloned());
                }
            }
        }
        alternatives.insert(ingredient.to_string());
        alternatives
    }

    /// Number of cached (result, shape) lookups.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_core::catalog;

    #[test]
    fn test_suffix_token_folds_wood_family() {
        assert_eq!(suffix_token("oak_log"), "log");
        assert_eq!(suffix_token("crimson_stem"), "log");
        assert_eq!(suffix_token("warped_hyphae"), "log");
        assert_eq!(suffix_token("oak_planks"), "planks");
        assert_eq!(suffix_token("bamboo"), "bamboo");
    }

    #[test]
    fn test_same_family_only_for_combinable_suffixes() {
        assert!(same_family("oak_planks", "spruce_planks"));
        assert!(same_family("oak_log", "crimson_stem"));
        assert!(!same_family("iron_ingot", "gold_ingot"));
        assert!(same_family("iron_ingot", "iron_ingot"));
    }

    #[test]
    fn test_canonical_key_ignores_materials() {
        let data = catalog::overworld();
        let furnaces = data.recipes_for("furnace");
        assert_eq!(furnaces.len(), 3);
        let key = canonical_key(furnaces[0]);
        assert!(furnaces.iter().all(|r| canonical_key(r) == key));
        assert!(key.requires_table);
        assert_eq!(key.fingerprint, "3x3:###/#.#/###");
    }

    #[test]
    fn test_dedup_collapses_mixed_species_sticks() {
        let data = catalog::overworld();
        let items = ["stick".to_string()];
        let entries = RecipeEntry::collect(&data, &items);
        assert_eq!(entries.len(), 17);
        let deduped = dedup_recipes(&data, entries);
        // one planks representative plus bamboo
        assert_eq!(deduped.len(), 2);
        assert_eq!(group_by_canonical_key(deduped).len(), 2);
    }

    #[test]
    fn test_dedup_keeps_distinct_stone_materials() {
        let data = catalog::overworld();
        let items = ["furnace".to_string()];
        let entries = RecipeEntry::collect(&data, &items);
        assert_eq!(dedup_recipes(&data, entries).len(), 3);
    }

    #[test]
    fn test_slot_alternatives_and_cache() {
        let data = catalog::overworld();
        let items = ["stone_pickaxe".to_string()];
        let entries = RecipeEntry::collect(&data, &items);
        let alternatives = RecipeAlternatives::new();

        let stone = alternatives.for_ingredient(&data, &entries[0], "cobblestone");
        assert_eq!(
            stone.into_iter().collect::<Vec<_>>(),
            vec!["blackstone", "cobbled_deepslate", "cobblestone"]
        );
        let stick = alternatives.for_ingredient(&data, &entries[0], "stick");
        assert_eq!(stick.len(), 1);
        assert_eq!(alternatives.cached(), 1);
    }

    #[test]
    fn test_split_by_pool_separates_ingredient_families() {
        let data = catalog::overworld();
        let items: Vec<String> = ["oak_planks", "spruce_planks", "crimson_planks"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let entries = RecipeEntry::collect(&data, &items);
        let alternatives = RecipeAlternatives::new();
        let split = split_by_ingredient_pool(entries, |entry| {
            entry
                .ingredients(&data)
                .iter()
                .map(|(_, name, _)| {
                    PoolKey::for_ingredient(name, &alternatives.for_ingredient(&data, entry, name))
                })
                .collect()
        });
        // logs and stems share the wood family pool
        assert_eq!(split.len(), 1);
        assert_eq!(split[0].len(), 3);
    }
}
