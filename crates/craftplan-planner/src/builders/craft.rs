//! Craft strategy.

use std::collections::BTreeSet;

use craftplan_core::{
    CraftNode, GameData, Inventory, ItemId, ItemStack, Operator, TreeNode, VariantGroup,
    VariantMode, CRAFTING_TABLE, INVENTORY_GRID,
};
use tracing::debug;

use super::{ceil_div, AcquisitionBuilder};
use crate::context::BuildContext;
use crate::dependencies::inject_workstation_dependency;
use crate::grouping::{
    dedup_recipes, group_by_canonical_key, split_by_ingredient_pool, PoolKey, RecipeEntry,
};

/// One ingredient of a recipe with the request it feeds.
#[derive(Debug, Clone)]
struct Ingredient {
    id: ItemId,
    name: String,
    per_craft: u32,
    alternatives: BTreeSet<String>,
    pool: PoolKey,
}

/// A recipe variant of a craft node.
#[derive(Debug, Clone)]
struct Member<'a> {
    entry: RecipeEntry<'a>,
    ingredients: Vec<Ingredient>,
}

/// Items requested from one ingredient subtree.
#[derive(Debug)]
struct Pool {
    key: PoolKey,
    items: BTreeSet<String>,
    count: u32,
}

fn describe<'a>(builder: &dyn AcquisitionBuilder, entry: RecipeEntry<'a>, combine: bool) -> Member<'a> {
    let data = builder.data();
    let ingredients = entry
        .ingredients(data)
        .into_iter()
        .map(|(id, name, per_craft)| {
            let alternatives = builder.alternatives().for_ingredient(data, &entry, &name);
            let pool = if combine {
                PoolKey::for_ingredient(&name, &alternatives)
            } else {
                PoolKey::Item(name.clone())
            };
            Ingredient {
                id,
                name,
                per_craft,
                alternatives,
                pool,
            }
        })
        .collect();
    Member { entry, ingredients }
}

fn pool_signature(member: &Member<'_>) -> Vec<PoolKey> {
    let mut keys: Vec<PoolKey> = member.ingredients.iter().map(|i| i.pool.clone()).collect();
    keys.sort();
    keys
}

/// False if the recipe uses an ingredient whose slot pool is committed to a
/// different member.
fn honours_constraints(member: &Member<'_>, ctx: &BuildContext) -> bool {
    member.ingredients.iter().all(|ingredient| {
        let Some(primary) = ingredient.alternatives.first() else {
            return true;
        };
        if ingredient.alternatives.len() < 2 {
            return true;
        }
        match ctx.variant_constraints.required_variant(primary) {
            Some(required) if ingredient.alternatives.contains(required) => required == ingredient.name,
            _ => true,
        }
    })
}

/// Drop recipes that would turn a reversible pair into a loop. Converting
/// back is only allowed when the branch already holds every unit needed.
fn passes_cycle_guard(data: &GameData, member: &Member<'_>, craftings: u32, inventory: &Inventory) -> bool {
    member.ingredients.iter().all(|ingredient| {
        if !data.is_direct_cycle(member.entry.item_id, ingredient.id) {
            return true;
        }
        let needed = ingredient.per_craft.saturating_mul(craftings);
        let held = inventory.get(&ingredient.name);
        if held < needed {
            debug!(
                result = member.entry.item_name,
                ingredient = %ingredient.name,
                needed,
                held,
                "direct conversion cycle, dropping recipe"
            );
            return false;
        }
        true
    })
}

/// Merge ingredients of all members into subtree requests. The count of a
/// pool is the largest single-member demand.
fn merge_pools(members: &[Member<'_>], craftings: u32) -> Vec<Pool> {
    let mut pools: Vec<Pool> = Vec::new();
    for member in members {
        for ingredient in &member.ingredients {
            let needed = ingredient.per_craft.saturating_mul(craftings);
            let pool = match pools.iter().position(|p| p.key == ingredient.pool) {
                Some(i) => &mut pools[i],
                None => {
                    pools.push(Pool {
                        key: ingredient.pool.clone(),
                        items: BTreeSet::new(),
                        count: 0,
                    });
                    let last = pools.len() - 1;
                    &mut pools[last]
                }
            };
            match &ingredient.pool {
                PoolKey::Alternatives(items) => pool.items.extend(items.iter().cloned()),
                _ => {
                    pool.items.insert(ingredient.name.clone());
                }
            }
            pool.count = pool.count.max(needed);
        }
    }
    pools
}

/// Build craft nodes producing `remaining` units of any of `targets`.
pub fn build_craft_nodes(
    builder: &dyn AcquisitionBuilder,
    targets: &[String],
    mode: VariantMode,
    remaining: u32,
    ctx: &BuildContext,
) -> Vec<TreeNode> {
    let data = builder.data();
    let combine = ctx.combine_similar_nodes;

    let entries: Vec<RecipeEntry<'_>> = RecipeEntry::collect(data, targets)
        .into_iter()
        .filter(|entry| honours_constraints(&describe(builder, *entry, combine), ctx))
        .collect();
    if entries.is_empty() {
        return Vec::new();
    }

    let groups: Vec<Vec<RecipeEntry<'_>>> = if combine {
        group_by_canonical_key(dedup_recipes(data, entries))
            .into_iter()
            .flat_map(|(_, group)| {
                split_by_ingredient_pool(group, |entry| pool_signature(&describe(builder, *entry, combine)))
            })
            .collect()
    } else {
        entries.into_iter().map(|entry| vec![entry]).collect()
    };

    groups
        .into_iter()
        .filter_map(|group| build_node(builder, group, mode, remaining, ctx))
        .collect()
}

fn build_node(
    builder: &dyn AcquisitionBuilder,
    group: Vec<RecipeEntry<'_>>,
    mode: VariantMode,
    remaining: u32,
    ctx: &BuildContext,
) -> Option<TreeNode> {
    let data = builder.data();
    let combine = ctx.combine_similar_nodes;
    let first = group.first()?;
    let result_count = first.recipe.result.count.max(1);
    let requires_table = first.recipe.requires_table();
    let craftings = ceil_div(remaining, result_count);

    let members: Vec<Member<'_>> = group
        .into_iter()
        .map(|entry| describe(builder, entry, combine))
        .filter(|member| passes_cycle_guard(data, member, craftings, &ctx.inventory))
        .collect();
    if members.is_empty() {
        return None;
    }

    let mut node_ctx = ctx.clone();
    let station = if requires_table { CRAFTING_TABLE } else { INVENTORY_GRID };
    let mut node = CraftNode {
        operator: Operator::And,
        variant_mode: Some(mode),
        what: VariantGroup::single(station.to_string()),
        count: craftings,
        result: VariantGroup::from_values(
            mode,
            members
                .iter()
                .map(|m| ItemStack::new(m.entry.item_name, result_count)),
        ),
        ingredients: VariantGroup::from_values(
            mode,
            members.iter().map(|m| {
                m.ingredients
                    .iter()
                    .map(|i| ItemStack::new(i.name.clone(), i.per_craft))
                    .collect::<Vec<_>>()
            }),
        ),
        children: VariantGroup::default(),
        context: Some(node_ctx.snapshot()),
    };

    // A literal recipe pins its slot pools for everything built below it.
    if !combine {
        for ingredient in members.iter().flat_map(|m| &m.ingredients) {
            if ingredient.alternatives.len() > 1 {
                if let Some(primary) = ingredient.alternatives.first() {
                    node_ctx.variant_constraints.require(primary, &ingredient.name);
                }
            }
        }
    }

    // Held ingredients are set aside before anything else draws on the stock.
    let mut requests = Vec::new();
    for pool in merge_pools(&members, craftings) {
        let items: Vec<String> = pool.items.into_iter().collect();
        let held = node_ctx.inventory.take_greedy(&items, pool.count);
        let shortfall = pool.count - held;
        if shortfall > 0 {
            requests.push((pool.key, items, shortfall));
        }
    }

    if requires_table {
        inject_workstation_dependency(builder, &mut node.children, CRAFTING_TABLE, &mut node_ctx);
    }

    for (key, items, shortfall) in requests {
        let mut child_ctx = node_ctx.clone();
        if matches!(key, PoolKey::Suffix(_)) && items.len() > 1 {
            if let Some(primary) = items.first() {
                child_ctx.variant_constraints.allow(primary, &items);
            }
        }
        let child = TreeNode::Root(builder.build_recipe_tree(&items, shortfall, &child_ctx));
        node_ctx.consume(&child);
        node.children.push(child);
    }

    let mut node = TreeNode::Craft(node);
    node.simplify_variants();
    Some(node)
}
