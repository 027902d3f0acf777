//! Strategy builders.
//!
//! Each builder turns one acquisition strategy for a resolved item group into
//! zero or more nodes. Prerequisites (ingredients, workstations, tools, fuel)
//! are requested through [`AcquisitionBuilder`], which the tree orchestrator
//! implements, so the recursion goes back through variant resolution and the
//! visited guard.

pub mod craft;
pub mod hunt;
pub mod mine;
pub mod smelt;

use craftplan_core::{GameData, RootNode};

use crate::config::PlannerConfig;
use crate::context::BuildContext;
use crate::grouping::RecipeAlternatives;

pub use craft::build_craft_nodes;
pub use hunt::build_hunt_nodes;
pub use mine::build_mine_nodes;
pub use smelt::build_smelt_nodes;

/// Callback surface the strategy builders recurse through.
pub trait AcquisitionBuilder {
    /// Game data for the current build.
    fn data(&self) -> &GameData;

    /// Active configuration.
    fn config(&self) -> &PlannerConfig;

    /// Slot alternative cache for the current build.
    fn alternatives(&self) -> &RecipeAlternatives;

    /// Build the acquisition tree for `count` units of the group `items`.
    fn build_recipe_tree(&self, items: &[String], count: u32, ctx: &BuildContext) -> RootNode;
}

/// `ceil(amount / per)`, treating a zero divisor as one.
pub(crate) fn ceil_div(amount: u32, per: u32) -> u32 {
    let per = per.max(1);
    amount / per + u32::from(amount % per != 0)
}

/// `ceil(amount / per)` for fractional yields; non-positive yields count as one.
pub(crate) fn ceil_div_f64(amount: u32, per: f64) -> u32 {
    if per <= 0.0 || !per.is_finite() {
        return amount;
    }
    (f64::from(amount) / per).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(8, 4), 2);
        assert_eq!(ceil_div(9, 4), 3);
        assert_eq!(ceil_div(0, 4), 0);
        assert_eq!(ceil_div(3, 0), 3);
    }

    #[test]
    fn test_ceil_div_f64() {
        assert_eq!(ceil_div_f64(3, 0.025), 120);
        assert_eq!(ceil_div_f64(3, 8.0), 1);
        assert_eq!(ceil_div_f64(5, 0.0), 5);
    }
}
