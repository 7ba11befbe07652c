use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use training_paths_api::app::{router, AppState};
use training_paths_api::config::{AppConfig, StoreBackend};
use training_paths_api::database::fixture::Fixture;
use training_paths_api::database::MemoryStore;

pub const FIXTURE: &str = r#"
katas:
  - name: two-sum
    description: find a pair summing to a target
    difficulty: easy
    rawkata: "fn two_sum(nums: &[i32], target: i32) -> (usize, usize) { todo!() }"
  - name: rotate
    description: rotate an array in place
    difficulty: medium
    rawkata: "fn rotate(nums: &mut [i32], k: usize) { todo!() }"
  - name: bfs
    difficulty: medium
    rawkata: "fn bfs() {}"
paths:
  - topic: arrays
    name: Arrays
    description: intro
    enabled: true
    katas: [rotate, two-sum]
  - topic: graphs
    name: Graphs
    description: traversal
    katas: [bfs]
users:
  - username: ada
    email: ada@example.com
    password: analytical
"#;

pub struct TestApp {
    pub base_url: String,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serves the real router over a memory store seeded with `FIXTURE`
pub async fn spawn_app() -> Result<TestApp> {
    let store = MemoryStore::new();
    Fixture::from_yaml(FIXTURE)?.apply(&store).await?;
    spawn_with_store(store).await
}

pub async fn spawn_with_store(store: MemoryStore) -> Result<TestApp> {
    let mut config = AppConfig::development();
    config.database.backend = StoreBackend::Memory;
    config.api.enable_request_logging = false;

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let app = router(AppState::new(Arc::new(store.clone()), &config), &config);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let test_app = TestApp { base_url, store };
    wait_ready(&test_app, Duration::from_secs(5)).await?;
    Ok(test_app)
}

async fn wait_ready(app: &TestApp, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Ok(resp) = client.get(app.url("/health")).send().await {
            if resp.status() == StatusCode::OK {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("server did not become ready on {} within {:?}", app.base_url, timeout)
}
