//! # Craftplan Planner
//!
//! Acquisition-tree planning for craftplan.
//!
//! A build resolves the requested item against the game data and recursively
//! expands every way of obtaining it (craft, smelt, mine, hunt) into an
//! AND/OR tree. Structurally identical recipes and resources are merged into
//! variant nodes, per-branch state is cloned at every fork, and a fixed-point
//! filter removes variants whose ingredients turned out to be unreachable.
//! [`first_path`] linearizes the tree and [`remove_orphaned_ingredients`]
//! trims the result.

pub mod builders;
pub mod config;
pub mod constraints;
pub mod context;
pub mod dependencies;
pub mod filter;
pub mod grouping;
pub mod linearize;
pub mod optimize;
pub mod planner;
pub mod tree;
pub mod variants;

pub use builders::AcquisitionBuilder;
pub use config::PlannerConfig;
pub use constraints::{VariantConstraint, VariantConstraintManager};
pub use context::BuildContext;
pub use filter::{filter_tree, FilterReport, MAX_FILTER_PASSES};
pub use linearize::first_path;
pub use optimize::remove_orphaned_ingredients;
pub use planner::{PlanOutcome, PlanRequest, PlanStats, Planner, TreePlanner};
pub use tree::{build_recipe_tree, TreeBuilder};
