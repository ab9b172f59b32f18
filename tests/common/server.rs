//! Test server lifecycle management
//!
//! Each test gets an isolated server loaded from its own temporary snapshots.

use super::constants::*;
use super::fixtures::{create_test_snapshots, test_similarity, test_tracks};
use serde_json::Value;
use songrec_server::catalog::{load_catalog, load_similarity_index};
use songrec_server::recommend::Recommender;
use songrec_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated snapshots
///
/// When dropped, the server gracefully shuts down and temp files are removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server over the fixture catalog on a random port
    pub async fn spawn() -> Self {
        let tracks = test_tracks();
        Self::spawn_with(&tracks, &test_similarity(CATALOG_SIZE)).await
    }

    /// Spawns a server over the given snapshots
    ///
    /// # Panics
    ///
    /// Panics if the snapshots do not load, the port cannot be bound or the
    /// server doesn't become ready within timeout.
    pub async fn spawn_with(tracks: &Value, similarity: &[Vec<f32>]) -> Self {
        let (temp_dir, songs_path, similarity_path) =
            create_test_snapshots(tracks, similarity).expect("Failed to write test snapshots");

        let catalog = load_catalog(&songs_path).expect("Failed to load test catalog");
        let index = load_similarity_index(&similarity_path, catalog.len())
            .expect("Failed to load test similarity matrix");
        let recommender =
            Recommender::new(catalog, index).expect("Test snapshots are misaligned");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            content_cache_age_sec: 0,
            ..ServerConfig::default()
        };
        let app = make_app(config, Arc::new(recommender));

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_for_ready().await;
        server
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::new();
        let start = Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
