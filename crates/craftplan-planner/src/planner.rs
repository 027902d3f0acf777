//! Planner trait and the tree-based implementation.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use craftplan_core::{
    ActionPath, CraftplanError, DataRegistry, Inventory, Result, TreeNode, WorldBudget,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::PlannerConfig;
use crate::context::BuildContext;
use crate::filter::{filter_tree, FilterReport};
use crate::linearize::first_path;
use crate::optimize::remove_orphaned_ingredients;
use crate::tree::TreeBuilder;

/// A request to plan the acquisition of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Game data version; the registry default when absent.
    #[serde(default)]
    pub version: Option<String>,

    /// Item to obtain.
    pub item: String,

    /// Units to obtain.
    pub count: u32,

    /// Items already held.
    #[serde(default)]
    pub inventory: Inventory,

    /// Reachable world resources, used when pruning is enabled.
    #[serde(default)]
    pub world: Option<WorldBudget>,

    /// Overrides the planner's configuration for this request.
    #[serde(default)]
    pub config: Option<PlannerConfig>,
}

impl PlanRequest {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            version: None,
            item: item.into(),
            count,
            inventory: Inventory::new(),
            world: None,
            config: None,
        }
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_world(mut self, world: WorldBudget) -> Self {
        self.world = Some(world);
        self
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Summary numbers for a finished plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    pub node_count: usize,
    pub height: usize,
    pub path_len: usize,
    /// Steps the orphan pass removed from the first path.
    pub steps_removed: usize,
    pub planning_time_ms: u64,
}

/// Result of planning one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub version: String,
    pub item: String,
    pub count: u32,
    pub tree: TreeNode,
    /// Present when the post-build filter ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterReport>,
    pub path: ActionPath,
    pub stats: PlanStats,
}

impl PlanOutcome {
    /// True when the tree offers no way to obtain the item.
    pub fn is_unobtainable(&self) -> bool {
        self.tree.is_empty_root() && self.tree.count() > 0
    }
}

/// Trait for planning engines.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Build the acquisition tree and a first path for `request`.
    async fn plan(&self, request: &PlanRequest) -> Result<PlanOutcome>;

    /// Get the planner configuration.
    fn config(&self) -> &PlannerConfig;

    /// Update the planner configuration.
    fn set_config(&mut self, config: PlannerConfig);
}

/// Planner backed by the recursive tree builder.
#[derive(Debug, Clone)]
pub struct TreePlanner {
    registry: Arc<DataRegistry>,
    config: PlannerConfig,
}

impl TreePlanner {
    /// Create a planner over `registry` with the default configuration.
    pub fn new(registry: Arc<DataRegistry>) -> Self {
        Self::with_config(registry, PlannerConfig::default())
    }

    pub fn with_config(registry: Arc<DataRegistry>, config: PlannerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<DataRegistry> {
        &self.registry
    }

    /// Synchronous planning. Tree building never awaits, so callers on an
    /// async runtime should run this on a blocking thread.
    pub fn plan_blocking(&self, request: &PlanRequest) -> Result<PlanOutcome> {
        let start = Instant::now();

        if request.count == 0 {
            return Err(CraftplanError::InvalidRequest {
                message: "count must be at least 1".to_string(),
            });
        }
        let data = self.registry.resolve(request.version.as_deref())?;
        if !data.has_item(&request.item) {
            return Err(CraftplanError::UnknownItem {
                name: request.item.clone(),
            });
        }

        let config = request.config.as_ref().unwrap_or(&self.config);
        let ctx = BuildContext::new(request.inventory.clone())
            .with_config(config)
            .with_world_budget(request.world.clone().map(Arc::new));

        let mut tree = TreeBuilder::new(&data, config).build(&request.item, request.count, &ctx);
        let filter = config.runs_post_build_filter().then(|| filter_tree(&mut tree));

        let first = first_path(&tree);
        let path = remove_orphaned_ingredients(&first);

        let stats = PlanStats {
            node_count: tree.node_count(),
            height: tree.height(),
            path_len: path.len(),
            steps_removed: first.len() - path.len(),
            planning_time_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            item = %request.item,
            count = request.count,
            version = data.version(),
            nodes = stats.node_count,
            steps = stats.path_len,
            elapsed_ms = stats.planning_time_ms,
            "plan built"
        );

        Ok(PlanOutcome {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            version: data.version().to_string(),
            item: request.item.clone(),
            count: request.count,
            tree,
            filter,
            path,
            stats,
        })
    }
}

#[async_trait]
impl Planner for TreePlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<PlanOutcome> {
        self.plan_blocking(request)
    }

    fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn set_config(&mut self, config: PlannerConfig) {
        self.config = config;
    }
}
