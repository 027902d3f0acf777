//! End-to-end planning scenarios through [`TreePlanner`].

use std::sync::Arc;

use craftplan_core::{ActionKind, ActionStep, DataRegistry, Inventory, ItemStack};
use craftplan_planner::{remove_orphaned_ingredients, PlanRequest, Planner, TreePlanner};

fn planner() -> TreePlanner {
    TreePlanner::new(Arc::new(DataRegistry::with_builtin()))
}

fn output(step: &ActionStep) -> Option<&str> {
    step.result
        .as_ref()
        .and_then(|r| r.first())
        .map(|s| s.name.as_str())
        .or_else(|| step.target_item.as_ref().and_then(|t| t.first()).map(String::as_str))
}

#[tokio::test]
async fn test_smelt_demand_with_partial_stock() {
    let inventory = Inventory::from_pairs([
        ("raw_iron", 1),
        ("coal", 5),
        ("furnace", 1),
        ("stone_pickaxe", 1),
    ]);
    let request = PlanRequest::new("iron_ingot", 3).with_inventory(inventory);
    let outcome = planner().plan(&request).await.unwrap();

    let mine = outcome
        .path
        .iter()
        .find(|s| s.action == ActionKind::Mine && output(s) == Some("raw_iron"))
        .unwrap();
    assert_eq!(mine.count, 2);

    let smelt = outcome.path.iter().find(|s| s.action == ActionKind::Smelt).unwrap();
    assert_eq!(smelt.count, 3);
    assert_eq!(outcome.path.len(), 2);
}

#[tokio::test]
async fn test_held_tool_is_not_rebuilt() {
    let request = PlanRequest::new("cobblestone", 3).with_inventory(Inventory::from_pairs([("diamond_pickaxe", 1)]));
    let outcome = planner().plan(&request).await.unwrap();

    assert_eq!(outcome.path.len(), 1);
    assert_eq!(outcome.path[0].action, ActionKind::Mine);
    assert_eq!(outcome.path[0].count, 3);
}

fn position(path: &[ActionStep], action: ActionKind, item: &str) -> usize {
    path.iter()
        .position(|s| s.action == action && output(s) == Some(item))
        .unwrap_or_else(|| panic!("no {} step for {}", action, item))
}

fn tool_of(step: &ActionStep) -> Option<&str> {
    step.tool.as_ref().and_then(|t| t.first()).map(String::as_str)
}

#[tokio::test]
async fn test_path_ends_with_requested_item() {
    let outcome = planner().plan(&PlanRequest::new("stone_pickaxe", 1)).await.unwrap();
    let path = &outcome.path;
    assert_eq!(output(path.last().unwrap()), Some("stone_pickaxe"));

    let table_built = position(path, ActionKind::Craft, "crafting_table");
    let table_used = path.iter().position(|s| s.what.contains_name("crafting_table")).unwrap();
    assert!(table_built < table_used);
}

#[tokio::test]
async fn test_tool_progression_builds_lower_tier_first() {
    let outcome = planner().plan(&PlanRequest::new("stone_pickaxe", 1)).await.unwrap();
    let path = &outcome.path;

    let wooden = position(path, ActionKind::Craft, "wooden_pickaxe");
    let stone_mine = path
        .iter()
        .position(|s| s.action == ActionKind::Mine && tool_of(s) == Some("wooden_pickaxe"))
        .unwrap();
    assert!(wooden < stone_mine);
    assert!(stone_mine < path.len() - 1);
}

#[tokio::test]
async fn test_iron_tools_need_stone_tools() {
    let outcome = planner().plan(&PlanRequest::new("iron_pickaxe", 1)).await.unwrap();
    let path = &outcome.path;

    let wooden = position(path, ActionKind::Craft, "wooden_pickaxe");
    let stone = position(path, ActionKind::Craft, "stone_pickaxe");
    let ore = position(path, ActionKind::Mine, "raw_iron");
    assert!(wooden < stone);
    assert!(stone < ore);
    assert_eq!(tool_of(&path[ore]), Some("stone_pickaxe"));
    assert_eq!(output(path.last().unwrap()), Some("iron_pickaxe"));
}

#[test]
fn test_orphan_removal_trims_overproduction() {
    let path = vec![
        ActionStep::mine("oak_log", "oak_log", 8),
        ActionStep::craft(ItemStack::new("oak_planks", 4), vec![ItemStack::new("oak_log", 1)], 8, false),
        ActionStep::craft(ItemStack::new("stick", 4), vec![ItemStack::new("oak_planks", 2)], 4, false),
        ActionStep::craft(
            ItemStack::new("wooden_pickaxe", 1),
            vec![ItemStack::new("oak_planks", 3), ItemStack::new("stick", 2)],
            1,
            true,
        ),
    ];
    let trimmed = remove_orphaned_ingredients(&path);
    let counts: Vec<u32> = trimmed.iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![2, 2, 1, 1]);
}

#[tokio::test]
async fn test_outcome_serializes() {
    let outcome = planner().plan(&PlanRequest::new("torch", 4)).await.unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["tree"]["action"], "root");
    assert!(json["path"].as_array().is_some_and(|p| !p.is_empty()));
}
