//! Test fixtures: an in-memory store behind every port, token minting and a
//! ready-to-serve router.

mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, Utc};

use crate::auth::{generate_jwt, Claims, TokenVerifier};
use crate::services::pdf::{PdfError, PdfRenderer};
use crate::state::{AppState, Repositories};

/// Shared secret used by [`test_state`] and [`token_for`]
pub const TEST_SECRET: &str = "babycare-test-secret";

/// One-hour HS256 token carrying `email`
pub fn token_for(email: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        email: Some(email.to_string()),
        sub: None,
        iss: None,
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };
    generate_jwt(TEST_SECRET, &claims).unwrap_or_default()
}

/// `Authorization` header value for `email`
pub fn bearer(email: &str) -> String {
    format!("Bearer {}", token_for(email))
}

/// Wraps the HTML in a fake PDF header instead of shelling out
pub struct StubPdfRenderer;

#[async_trait]
impl PdfRenderer for StubPdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, PdfError> {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.extend_from_slice(html.as_bytes());
        Ok(bytes)
    }
}

impl Repositories {
    pub fn in_memory(store: &Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            babies: store.clone(),
            feeding: store.clone(),
            growth: store.clone(),
            milestones: store.clone(),
            stool: store.clone(),
            reminders: store.clone(),
            forum: store.clone(),
            journal: store.clone(),
            documents: store.clone(),
            exports: store.clone(),
            lookups: store.clone(),
            providers: store.clone(),
        }
    }
}

pub fn test_state(store: &Arc<MemoryStore>) -> AppState {
    let verifier = match TokenVerifier::new(TEST_SECRET, None) {
        Ok(v) => v,
        Err(e) => panic!("test verifier: {}", e),
    };
    match AppState::new(Repositories::in_memory(store), store.clone(), verifier, Arc::new(StubPdfRenderer)) {
        Ok(state) => state,
        Err(e) => panic!("test state: {}", e),
    }
}

/// Store plus the full router wired to it
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let app = crate::routes::app(test_state(&store), &crate::config::AppConfig::development());
        Self { store, app }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
