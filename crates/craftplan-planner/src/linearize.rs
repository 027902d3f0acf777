//! Greedy linearization of an acquisition tree.
//!
//! Produces one concrete path: the first workable child of every OR node and
//! every child of an AND node, with prerequisites emitted before the step
//! that needs them. Where a node offers several variants, the one matching
//! what the parent asked for is preferred.

use craftplan_core::{
    ActionPath, ActionStep, ItemStack, TreeNode, Variant, VariantGroup, VariantMode,
    CRAFTING_TABLE,
};

use crate::grouping::same_family;

/// Linearize `root` into an ordered list of steps.
pub fn first_path(root: &TreeNode) -> ActionPath {
    let mut path = ActionPath::new();
    emit(root, &[], &mut path);
    path
}

/// Index of the first option producing a wanted item, by exact name first
/// and by family second. Falls back to the first option.
fn pick(options: &[Vec<&str>], wanted: &[String]) -> usize {
    let exact = options
        .iter()
        .position(|outputs| outputs.iter().any(|o| wanted.iter().any(|w| w == o)));
    let family = || {
        options
            .iter()
            .position(|outputs| outputs.iter().any(|o| wanted.iter().any(|w| same_family(w, o))))
    };
    exact.or_else(family).unwrap_or(0)
}

fn single<T: Clone>(variant: &Variant<T>) -> VariantGroup<T> {
    VariantGroup {
        mode: VariantMode::OneOf,
        variants: vec![variant.clone()],
    }
}

fn emit_children(children: &VariantGroup<TreeNode>, wanted: &[String], path: &mut ActionPath) -> Vec<String> {
    let mut produced = Vec::new();
    for child in children.values() {
        produced.extend(emit(child, wanted, path));
    }
    produced
}

/// Name an ingredient after the family member a child actually produced.
fn match_produced(name: &str, produced: &[String]) -> String {
    if produced.iter().any(|p| p == name) {
        return name.to_string();
    }
    produced
        .iter()
        .find(|p| same_family(p, name))
        .cloned()
        .unwrap_or_else(|| name.to_string())
}

fn emit(node: &TreeNode, wanted: &[String], path: &mut ActionPath) -> Vec<String> {
    match node {
        TreeNode::Root(root) => {
            let own: Vec<String>;
            let wanted = if wanted.is_empty() {
                own = root.what.values().cloned().collect();
                own.as_slice()
            } else {
                wanted
            };
            let options: Vec<Vec<&str>> = root.children.values().map(TreeNode::outputs).collect();
            match root.children.get(pick(&options, wanted)) {
                Some(child) => emit(child, wanted, path),
                None => Vec::new(),
            }
        }
        TreeNode::Craft(craft) => {
            let options: Vec<Vec<&str>> = craft.result.values().map(|s| vec![s.name.as_str()]).collect();
            let index = pick(&options, wanted);
            let (Some(result), Some(ingredients)) = (craft.result.get(index), craft.ingredients.get(index)) else {
                return Vec::new();
            };

            let mut needs: Vec<String> = ingredients.iter().map(|s| s.name.clone()).collect();
            needs.extend(craft.what.values().cloned());
            let produced = emit_children(&craft.children, &needs, path);

            let ingredients = ingredients
                .iter()
                .map(|s| ItemStack::new(match_produced(&s.name, &produced), s.count))
                .collect();
            let table = craft.what.contains_name(CRAFTING_TABLE);
            path.push(ActionStep::craft(result.clone(), ingredients, craft.count, table));
            vec![result.name.clone()]
        }
        TreeNode::Mine(mine) => {
            let needs: Vec<String> = mine.tool.iter().flat_map(|t| t.values().cloned()).collect();
            emit_children(&mine.children, &needs, path);

            let options: Vec<Vec<&str>> = mine.target_item.values().map(|t| vec![t.as_str()]).collect();
            let index = pick(&options, wanted);
            let (Some(block), Some(target)) = (
                mine.what.get(index).or_else(|| mine.what.first()),
                mine.target_item.variants.get(index),
            ) else {
                return Vec::new();
            };

            let mut step = ActionStep::mine(block, &target.value, mine.count);
            step.target_item = Some(single(target));
            step.tool = mine.tool.clone();
            path.push(step);
            vec![target.value.clone()]
        }
        TreeNode::Smelt(smelt) => {
            let mut needs: Vec<String> = smelt.input.values().map(|s| s.name.clone()).collect();
            needs.extend(smelt.fuel.iter().flat_map(|f| f.values().map(|s| s.name.clone())));
            needs.extend(smelt.what.values().cloned());
            emit_children(&smelt.children, &needs, path);

            let (Some(input), Some(result)) = (smelt.input.first(), smelt.result.first()) else {
                return Vec::new();
            };
            let fuel = smelt.fuel.as_ref().and_then(|f| f.first()).cloned();
            path.push(ActionStep::smelt(&input.name, &result.name, fuel, smelt.count));
            vec![result.name.clone()]
        }
        TreeNode::Hunt(hunt) if !hunt.children.is_empty() => {
            let options: Vec<Vec<&str>> = hunt.children.values().map(TreeNode::outputs).collect();
            match hunt.children.get(pick(&options, wanted)) {
                Some(child) => emit(child, wanted, path),
                None => Vec::new(),
            }
        }
        TreeNode::Hunt(hunt) => {
            let options: Vec<Vec<&str>> = hunt.target_item.values().map(|t| vec![t.as_str()]).collect();
            let index = pick(&options, wanted);
            let (Some(mob), Some(target)) = (hunt.what.first(), hunt.target_item.variants.get(index)) else {
                return Vec::new();
            };
            let mut step = ActionStep::hunt(mob, &target.value, hunt.count);
            step.target_item = Some(single(target));
            path.push(step);
            vec![target.value.clone()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_core::{catalog, ActionKind, Inventory};

    use crate::config::PlannerConfig;
    use crate::context::BuildContext;
    use crate::tree::build_recipe_tree;

    #[test]
    fn test_prerequisites_come_first() {
        let data = catalog::overworld();
        let config = PlannerConfig::default();
        let ctx = BuildContext::new(Inventory::new()).with_config(&config);
        let tree = build_recipe_tree(&data, &config, "wooden_pickaxe", 1, &ctx);
        let path = first_path(&tree);

        let last = path.last().unwrap();
        assert_eq!(last.action, ActionKind::Craft);
        assert_eq!(
            last.result.as_ref().and_then(|r| r.first()).map(|s| s.name.as_str()),
            Some("wooden_pickaxe")
        );
        assert_eq!(path[0].action, ActionKind::Mine);
    }

    #[test]
    fn test_chosen_variants_agree_along_the_path() {
        let data = catalog::overworld();
        let config = PlannerConfig::default();
        let ctx = BuildContext::new(Inventory::new()).with_config(&config);
        let tree = build_recipe_tree(&data, &config, "stick", 4, &ctx);
        let path = first_path(&tree);

        let names: Vec<(ActionKind, String)> = path
            .iter()
            .map(|s| {
                let output = s
                    .result
                    .as_ref()
                    .and_then(|r| r.first().map(|r| r.name.clone()))
                    .or_else(|| s.target_item.as_ref().and_then(|t| t.first().cloned()))
                    .unwrap_or_default();
                (s.action, output)
            })
            .collect();
        assert_eq!(
            names,
            vec![
                (ActionKind::Mine, "oak_log".to_string()),
                (ActionKind::Craft, "oak_planks".to_string()),
                (ActionKind::Craft, "stick".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_root_yields_empty_path() {
        let data = catalog::overworld();
        let config = PlannerConfig::default();
        let ctx = BuildContext::new(Inventory::new()).with_config(&config);
        let tree = build_recipe_tree(&data, &config, "unobtainium", 1, &ctx);
        assert!(first_path(&tree).is_empty());
    }
}
