//! Backward-demand orphan removal over a linear path.
//!
//! Walks the path from the goal step backwards, tracking how many units of
//! each item later steps still need. Steps nobody needs are dropped; steps
//! with a single demanded output shrink to the number of runs that demand
//! justifies.

use std::collections::BTreeMap;

use craftplan_core::tools::is_persistent_item;
use craftplan_core::{ActionKind, ActionPath, ActionStep, ItemStack, VariantGroup};
use tracing::debug;

use crate::builders::mine::ANY_TOOL;

/// Outstanding need per item.
#[derive(Debug, Default)]
struct Demand {
    items: BTreeMap<String, u32>,
}

impl Demand {
    fn get(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Tools and workstations are needed once, however many steps use them.
    fn add(&mut self, item: &str, count: u32) {
        if count == 0 {
            return;
        }
        let entry = self.items.entry(item.to_string()).or_insert(0);
        if is_persistent_item(item) {
            *entry = (*entry).max(1);
        } else {
            *entry = entry.saturating_add(count);
        }
    }

    fn consume(&mut self, item: &str, produced: u32) {
        if let Some(entry) = self.items.get_mut(item) {
            *entry = entry.saturating_sub(produced);
            if *entry == 0 {
                self.items.remove(item);
            }
        }
    }
}

/// Items a step yields, each with its yield per run.
fn outputs(step: &ActionStep) -> Vec<(String, f64)> {
    match step.action {
        ActionKind::Craft | ActionKind::Smelt => step
            .result
            .iter()
            .flat_map(VariantGroup::values)
            .map(|stack| {
                let per_run = if step.action == ActionKind::Craft { stack.count } else { 1 };
                (stack.name.clone(), f64::from(per_run.max(1)))
            })
            .collect(),
        ActionKind::Mine | ActionKind::Hunt => step
            .target_item
            .iter()
            .flat_map(|group| group.variants.iter())
            .map(|variant| {
                let per_run = variant
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get("yield"))
                    .and_then(|y| y.as_f64())
                    .filter(|y| y.is_finite() && *y > 0.0)
                    .unwrap_or(1.0);
                (variant.value.clone(), per_run)
            })
            .collect(),
        ActionKind::Root => Vec::new(),
    }
}

fn scale(per_run: u32, runs: u32, original_runs: u32) -> u32 {
    if original_runs == 0 {
        return per_run;
    }
    let scaled = u64::from(per_run) * u64::from(runs);
    u32::try_from(scaled.div_ceil(u64::from(original_runs))).unwrap_or(u32::MAX)
}

/// Add what `step` consumes when run `runs` times.
fn add_inputs(demand: &mut Demand, step: &ActionStep, runs: u32) {
    let single_stack = |group: &Option<VariantGroup<ItemStack>>| group.as_ref().and_then(|g| g.first()).cloned();

    match step.action {
        ActionKind::Craft => {
            if let Some(ingredients) = step.ingredients.as_ref().and_then(|g| g.first()) {
                for stack in ingredients {
                    demand.add(&stack.name, stack.count.saturating_mul(runs));
                }
            }
        }
        ActionKind::Smelt => {
            if let Some(input) = single_stack(&step.input) {
                demand.add(&input.name, input.count.saturating_mul(runs));
            }
            if let Some(fuel) = single_stack(&step.fuel) {
                demand.add(&fuel.name, scale(fuel.count, runs, step.count));
            }
        }
        ActionKind::Mine | ActionKind::Hunt | ActionKind::Root => {}
    }

    for station in step.what.values() {
        if matches!(step.action, ActionKind::Craft | ActionKind::Smelt) && is_persistent_item(station) {
            demand.add(station, 1);
        }
    }
    if let Some(tool) = step.tool.as_ref().and_then(|t| t.first()) {
        if tool != ANY_TOOL {
            demand.add(tool, 1);
        }
    }
}

/// Drop steps whose outputs nothing downstream needs and shrink the rest to
/// the demanded amount. Counts never grow.
pub fn remove_orphaned_ingredients(path: &[ActionStep]) -> ActionPath {
    let Some((goal, rest)) = path.split_last() else {
        return ActionPath::new();
    };

    let mut demand = Demand::default();
    add_inputs(&mut demand, goal, goal.count);

    let mut kept = vec![goal.clone()];
    for step in rest.iter().rev() {
        let demanded: Vec<(String, f64)> = outputs(step)
            .into_iter()
            .filter(|(item, _)| demand.get(item) > 0)
            .collect();

        match demanded.as_slice() {
            [] => {
                debug!(action = %step.action, what = ?step.what.first(), "dropping orphaned step");
            }
            [(item, per_run)] => {
                let need = demand.get(item);
                let runs = ((f64::from(need) / per_run).ceil() as u32).min(step.count);
                let produced = (f64::from(runs) * per_run).floor() as u32;
                demand.consume(item, produced.max(1));

                let mut step = step.clone();
                add_inputs(&mut demand, &step, runs);
                if let Some(fuel) = step.fuel.as_mut().and_then(|g| g.values_mut().next()) {
                    fuel.count = scale(fuel.count, runs, step.count);
                }
                step.count = runs;
                kept.push(step);
            }
            _ => {
                add_inputs(&mut demand, step, step.count);
                kept.push(step.clone());
            }
        }
    }

    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn planks_path(logs: u32, planks: u32, sticks: u32) -> ActionPath {
        vec![
            ActionStep::mine("oak_log", "oak_log", logs),
            ActionStep::craft(
                ItemStack::new("oak_planks", 4),
                vec![ItemStack::new("oak_log", 1)],
                planks,
                false,
            ),
            ActionStep::craft(
                ItemStack::new("stick", 4),
                vec![ItemStack::new("oak_planks", 2)],
                sticks,
                false,
            ),
            ActionStep::craft(
                ItemStack::new("wooden_pickaxe", 1),
                vec![ItemStack::new("oak_planks", 3), ItemStack::new("stick", 2)],
                1,
                true,
            ),
        ]
    }

    fn counts(path: &[ActionStep]) -> Vec<u32> {
        path.iter().map(|s| s.count).collect()
    }

    #[test]
    fn test_overproduced_chain_is_trimmed() {
        let trimmed = remove_orphaned_ingredients(&planks_path(8, 8, 4));
        assert_eq!(counts(&trimmed), vec![2, 2, 1, 1]);
    }

    #[test]
    fn test_counts_never_grow() {
        let trimmed = remove_orphaned_ingredients(&planks_path(1, 1, 1));
        assert_eq!(counts(&trimmed), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_unneeded_step_is_dropped() {
        let mut path = planks_path(2, 2, 1);
        path.insert(0, ActionStep::mine("stone", "cobblestone", 3));
        let trimmed = remove_orphaned_ingredients(&path);
        assert_eq!(trimmed.len(), 4);
        assert!(trimmed.iter().all(|s| !s.what.contains_name("stone")));
    }

    #[test]
    fn test_tool_demand_is_not_summed() {
        let path = vec![
            ActionStep::craft(
                ItemStack::new("wooden_pickaxe", 1),
                vec![ItemStack::new("oak_planks", 3)],
                3,
                false,
            ),
            ActionStep::mine("stone", "cobblestone", 2).with_tool("wooden_pickaxe"),
            ActionStep::mine("coal_ore", "coal", 1).with_tool("wooden_pickaxe"),
            ActionStep::craft(
                ItemStack::new("torch", 4),
                vec![ItemStack::new("coal", 1), ItemStack::new("cobblestone", 2)],
                1,
                false,
            ),
        ];
        let trimmed = remove_orphaned_ingredients(&path);
        assert_eq!(trimmed[0].count, 1);
    }

    #[test]
    fn test_yield_metadata_sets_runs() {
        let mut mine = ActionStep::mine("gravel", "flint", 6);
        mine.target_item = Some(VariantGroup::empty(craftplan_core::VariantMode::OneOf));
        if let Some(group) = mine.target_item.as_mut() {
            group.push_with_metadata("flint".to_string(), json!({ "yield": 0.5 }));
        }
        let path = vec![
            mine,
            ActionStep::craft(
                ItemStack::new("flint_and_steel", 1),
                vec![ItemStack::new("flint", 1)],
                1,
                false,
            ),
        ];
        let trimmed = remove_orphaned_ingredients(&path);
        assert_eq!(trimmed[0].count, 2);
    }

    #[test]
    fn test_smelt_fuel_scales_with_runs() {
        let path = vec![
            ActionStep::smelt("raw_iron", "iron_ingot", Some(ItemStack::new("coal", 2)), 16),
            ActionStep::craft(
                ItemStack::new("bucket", 1),
                vec![ItemStack::new("iron_ingot", 3)],
                1,
                true,
            ),
        ];
        let trimmed = remove_orphaned_ingredients(&path);
        assert_eq!(trimmed[0].count, 3);
        let fuel = trimmed[0].fuel.as_ref().and_then(|f| f.first()).unwrap();
        assert_eq!(fuel.count, 1);
    }

    #[test]
    fn test_ambiguous_step_is_kept_whole() {
        let mut mine = ActionStep::mine("gravel", "gravel", 5);
        mine.target_item = Some(VariantGroup::one_of(["gravel".to_string(), "flint".to_string()]));
        let path = vec![
            mine,
            ActionStep::craft(
                ItemStack::new("mix", 1),
                vec![ItemStack::new("gravel", 1), ItemStack::new("flint", 1)],
                1,
                false,
            ),
        ];
        let trimmed = remove_orphaned_ingredients(&path);
        assert_eq!(trimmed[0].count, 5);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let path = vec![
            ActionStep::mine("oak_log", "oak_log", u32::MAX),
            ActionStep::craft(
                ItemStack::new("oak_planks", 4),
                vec![ItemStack::new("oak_log", u32::MAX)],
                u32::MAX,
                false,
            ),
            ActionStep::smelt("oak_log", "charcoal", Some(ItemStack::new("coal", u32::MAX)), u32::MAX),
        ];
        let trimmed = remove_orphaned_ingredients(&path);
        assert_eq!(trimmed.len(), 2);
        assert_eq!(trimmed[0].count, u32::MAX);

        let mut path = path;
        path.push(ActionStep::craft(
            ItemStack::new("torch", 4),
            vec![ItemStack::new("charcoal", u32::MAX), ItemStack::new("oak_planks", u32::MAX)],
            u32::MAX,
            false,
        ));
        let trimmed = remove_orphaned_ingredients(&path);
        assert_eq!(trimmed.len(), 4);
        assert_eq!(trimmed[2].count, u32::MAX);
    }

    #[test]
    fn test_empty_path() {
        assert!(remove_orphaned_ingredients(&[]).is_empty());
    }
}
