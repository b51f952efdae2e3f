use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use babycare_api::config::AppConfig;
use babycare_api::testing::{bearer, test_state, MemoryStore};
use reqwest::{RequestBuilder, StatusCode};

/// Router served on a free local port over a fresh in-memory store
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::new());
        let app = babycare_api::routes::app(test_state(&store), &AppConfig::development());
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            base_url,
            store,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, email: &str) -> RequestBuilder {
        self.client.get(self.url(path)).header("Authorization", bearer(email))
    }

    pub fn post(&self, path: &str, email: &str) -> RequestBuilder {
        self.client.post(self.url(path)).header("Authorization", bearer(email))
    }

    pub fn delete(&self, path: &str, email: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).header("Authorization", bearer(email))
    }
}
