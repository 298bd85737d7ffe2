//! Common test utilities for writersphere-client integration tests.

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::MockServer;
use writersphere_client::{BackendClient, ClientConfig, Session, SessionStore};
use writersphere_core::UserId;

/// Anon key the harness configures.
pub const ANON_KEY: &str = "anon-test-key";

/// A mock backend plus a client pointed at it.
pub struct TestHarness {
    /// The mock backend.
    pub server: MockServer,
    /// Client under test.
    pub client: BackendClient,
    /// Holds the session file, when one is used.
    pub dir: TempDir,
}

impl TestHarness {
    /// Signed-out client with a session file in a temp dir.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let client = BackendClient::with_session_store(config(&server), store).unwrap();
        Self {
            server,
            client,
            dir,
        }
    }

    /// Client restored from a stored session for `user`.
    pub async fn signed_in(user: UserId) -> Self {
        Self::with_session(session(user, "user-token", far_future())).await
    }

    /// Client restored from the given stored session.
    pub async fn with_session(session: Session) -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&session).unwrap();
        let client = BackendClient::with_session_store(config(&server), store).unwrap();
        Self {
            server,
            client,
            dir,
        }
    }

    /// The session file backing the client.
    pub fn store(&self) -> SessionStore {
        SessionStore::new(self.dir.path().join("session.json"))
    }
}

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri(), ANON_KEY).unwrap()
}

/// A unix timestamp a long way off.
pub fn far_future() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

/// Session JSON as the auth API returns it.
pub fn session_json(user: UserId, access_token: &str, expires_at: i64) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": format!("{access_token}-refresh"),
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": expires_at,
        "user": {
            "id": user.to_string(),
            "email": "writer@example.com",
            "user_metadata": { "role": "writer" }
        }
    })
}

/// A typed session.
pub fn session(user: UserId, access_token: &str, expires_at: i64) -> Session {
    serde_json::from_value(session_json(user, access_token, expires_at)).unwrap()
}
