//! Application state.

use std::collections::HashMap;
use std::sync::Arc;

use craftplan_core::DataRegistry;
use craftplan_planner::{PlanOutcome, TreePlanner};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Loaded game data.
    pub registry: Arc<DataRegistry>,

    /// The planner.
    pub planner: Arc<TreePlanner>,

    /// Finished plans.
    pub plans: Arc<RwLock<HashMap<Uuid, PlanOutcome>>>,
}

impl AppState {
    /// Create a new application state over `registry`.
    pub fn new(registry: DataRegistry) -> Self {
        let registry = Arc::new(registry);
        Self {
            planner: Arc::new(TreePlanner::new(Arc::clone(&registry))),
            registry,
            plans: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store a plan.
    pub async fn store_plan(&self, plan: PlanOutcome) {
        let mut plans = self.plans.write().await;
        plans.insert(plan.id, plan);
    }

    /// Get a plan by ID.
    pub async fn get_plan(&self, id: Uuid) -> Option<PlanOutcome> {
        let plans = self.plans.read().await;
        plans.get(&id).cloned()
    }

    /// Remove a plan, returning it if it existed.
    pub async fn remove_plan(&self, id: Uuid) -> Option<PlanOutcome> {
        let mut plans = self.plans.write().await;
        plans.remove(&id)
    }

    /// List all plans, oldest first.
    pub async fn list_plans(&self) -> Vec<PlanOutcome> {
        let plans = self.plans.read().await;
        let mut all: Vec<PlanOutcome> = plans.values().cloned().collect();
        all.sort_by_key(|plan| plan.created_at);
        all
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DataRegistry::with_builtin())
    }
}
