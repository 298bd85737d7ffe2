//! The backend client handle.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use tokio::sync::watch;

use crate::auth::{Auth, Session, SessionStore};
use crate::rest::Query;
use crate::storage::Storage;
use crate::{ClientConfig, Error, Result};

/// Handle to the hosted backend.
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
/// Requests carry the anon key as `apikey` and, as bearer authorization,
/// the session's access token when signed in or the anon key otherwise.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    config: ClientConfig,
    session: watch::Sender<Option<Session>>,
    store: Option<SessionStore>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("url", &self.inner.config.url.as_str())
            .field("signed_in", &self.inner.session.borrow().is_some())
            .finish()
    }
}

impl BackendClient {
    /// Create a client with no persisted session.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::build(config, None, None)
    }

    /// Create a client whose session is loaded from, and saved to, `store`.
    pub fn with_session_store(config: ClientConfig, store: SessionStore) -> Result<Self> {
        let session = store.load()?;
        if session.is_some() {
            tracing::debug!(path = %store.path().display(), "restored session");
        }
        Self::build(config, Some(store), session)
    }

    fn build(
        config: ClientConfig,
        store: Option<SessionStore>,
        session: Option<Session>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("writersphere/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let (session, _) = watch::channel(session);
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                session,
                store,
            }),
        })
    }

    /// Connection settings.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Sign-up, sign-in, refresh, and sign-out.
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    /// Start a query against one table.
    pub fn table(&self, name: &str) -> Query {
        Query::new(self.clone(), name)
    }

    /// Object storage.
    pub fn storage(&self) -> Storage<'_> {
        Storage::new(self)
    }

    /// The session as last seen, without refreshing.
    pub fn current_session(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    /// Watch session changes: sign-in, refresh, and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }

    /// Replace the session, broadcast the change, and persist it.
    pub(crate) fn set_session(&self, session: Option<Session>) -> Result<()> {
        if let Some(store) = &self.inner.store {
            match &session {
                Some(s) => store.save(s)?,
                None => store.clear()?,
            }
        }
        self.inner.session.send_replace(session);
        Ok(())
    }

    /// A request with the `apikey` and bearer authorization headers set.
    pub(crate) fn request(&self, method: Method, path: &[&str]) -> RequestBuilder {
        let token = self
            .inner
            .session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone());
        self.request_with(method, path, token.as_deref())
    }

    /// Like [`BackendClient::request`] but always authorized as anon.
    pub(crate) fn anon_request(&self, method: Method, path: &[&str]) -> RequestBuilder {
        self.request_with(method, path, None)
    }

    fn request_with(&self, method: Method, path: &[&str], token: Option<&str>) -> RequestBuilder {
        let config = &self.inner.config;
        let url = config.endpoint(path.iter().copied());
        tracing::debug!(%method, %url, "backend request");
        self.inner
            .http
            .request(method, url)
            .header("apikey", &config.anon_key)
            .bearer_auth(token.unwrap_or(&config.anon_key))
    }

    /// Send a request, turning a non-success status into [`Error::Api`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = Error::from_response(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), error = %err, "backend error");
        Err(err)
    }
}
