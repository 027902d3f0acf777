//! # Craftplan Node
//!
//! HTTP planning service for craftplan.

use std::net::SocketAddr;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod state;

use config::{NodeConfig, LOG_VAR};
use state::AppState;

/// Run the craftplan node server.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    info!(
        versions = ?state.registry.versions(),
        "Craftplan node starting"
    );

    let app = create_router(state);

    info!("Listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router.
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health::health_check))
        // Plan API
        .route("/api/v1/plan", post(api::plan::create_plan))
        .route("/api/v1/plan/:id", get(api::plan::get_plan))
        .route("/api/v1/plan/:id", delete(api::plan::delete_plan))
        .route("/api/v1/plans", get(api::plan::list_plans))
        .route("/api/v1/versions", get(api::plan::list_versions))
        .route("/api/v1/path/optimize", post(api::optimize::optimize_path))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = NodeConfig::from_env()?;
    let registry = config.load_registry()?;
    run_server(config.addr, AppState::new(registry)).await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use craftplan_core::{ActionStep, ItemStack};
    use serde_json::{json, Value};

    use super::*;

    fn server() -> TestServer {
        TestServer::new(create_router(AppState::default())).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = server().get("/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["data_versions"], 1);
    }

    #[tokio::test]
    async fn test_plan_lifecycle() {
        let server = server();

        let response = server
            .post("/api/v1/plan")
            .json(&json!({ "item": "wooden_pickaxe", "count": 1 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let plan: Value = response.json();
        let id = plan["id"].as_str().unwrap().to_string();
        assert_eq!(plan["tree"]["action"], "root");
        assert!(!plan["path"].as_array().unwrap().is_empty());

        server.get(&format!("/api/v1/plan/{}", id)).await.assert_status_ok();

        let listed: Value = server.get("/api/v1/plans").await.json();
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["item"], "wooden_pickaxe");

        server
            .delete(&format!("/api/v1/plan/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/plan/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_plan_with_inventory_and_world() {
        let response = server()
            .post("/api/v1/plan")
            .json(&json!({
                "item": "stick",
                "count": 4,
                "inventory": { "oak_log": 1 },
                "world": { "blocks": { "oak_log": 8 } },
                "config": { "prune_with_world": true }
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let plan: Value = response.json();
        assert_eq!(plan["filter"]["converged"], true);
    }

    #[tokio::test]
    async fn test_plan_rejections() {
        let server = server();
        server
            .post("/api/v1/plan")
            .json(&json!({ "item": "unobtainium", "count": 1 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .post("/api/v1/plan")
            .json(&json!({ "item": "stick", "count": 0 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/api/v1/plan")
            .json(&json!({ "item": "stick", "count": 1, "version": "0.0.1" }))
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_versions() {
        let body: Value = server().get("/api/v1/versions").await.json();
        assert_eq!(body["default"], body["versions"][0]);
    }

    #[tokio::test]
    async fn test_optimize_path() {
        let path = vec![
            ActionStep::mine("stone", "cobblestone", 3),
            ActionStep::mine("oak_log", "oak_log", 4),
            ActionStep::craft(ItemStack::new("oak_planks", 4), vec![ItemStack::new("oak_log", 1)], 4, false),
            ActionStep::craft(
                ItemStack::new("crafting_table", 1),
                vec![ItemStack::new("oak_planks", 4)],
                1,
                false,
            ),
        ];
        let response = server()
            .post("/api/v1/path/optimize")
            .json(&json!({ "path": path }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["steps_removed"], 1);
        assert_eq!(body["path"][0]["count"], 1);
        assert_eq!(body["path"][1]["count"], 1);
    }

    #[tokio::test]
    async fn test_optimize_empty_path() {
        server()
            .post("/api/v1/path/optimize")
            .json(&json!({ "path": [] }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
