//! Email/password authentication.
//!
//! [`Auth`] wraps the auth endpoints: sign-up, password sign-in, token
//! refresh, sign-out, and fetching the current user. Every session change
//! goes through the owning [`BackendClient`], which broadcasts it to
//! [`BackendClient::subscribe`] receivers and persists it when a
//! [`SessionStore`] is attached.

pub mod session;
pub mod store;

pub use session::{EXPIRY_MARGIN_SECS, Session, User};
pub use store::SessionStore;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use writersphere_core::Role;

use crate::{BackendClient, Error, Result};

/// Outcome of a sign-up request.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpResponse {
    /// The account is usable immediately; the user is now signed in.
    Session(Session),
    /// The account exists but the email must be confirmed before sign-in.
    ConfirmationRequired(User),
}

impl SignUpResponse {
    /// The new user, in either case.
    pub fn user(&self) -> &User {
        match self {
            SignUpResponse::Session(s) => &s.user,
            SignUpResponse::ConfirmationRequired(u) => u,
        }
    }

    /// The session, when sign-up signed the user in.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SignUpResponse::Session(s) => Some(s),
            SignUpResponse::ConfirmationRequired(_) => None,
        }
    }
}

/// Auth operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
    client: &'a BackendClient,
}

/// Token grant endpoint.
const TOKEN: &[&str] = &["auth", "v1", "token"];

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Create an account with `role` stored in the user metadata.
    pub async fn sign_up(&self, email: &str, password: &str, role: Role) -> Result<SignUpResponse> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "role": role.as_str() },
        });
        let value: Value = self.post(&["auth", "v1", "signup"], &[], &body).await?;

        if value.get("access_token").is_some() {
            let session = decode::<Session>(value)?.stamped();
            tracing::info!(user = %session.user.id, "signed up and signed in");
            self.client.set_session(Some(session.clone()))?;
            return Ok(SignUpResponse::Session(session));
        }

        let user_value = match value.get("user") {
            Some(user) if user.is_object() => user.clone(),
            _ => value,
        };
        let user = decode::<User>(user_value)?;
        tracing::info!(user = %user.id, "signed up; email confirmation required");
        Ok(SignUpResponse::ConfirmationRequired(user))
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let body = json!({ "email": email, "password": password });
        let session = self
            .post::<Session>(TOKEN, &[("grant_type", "password")], &body)
            .await?
            .stamped();
        tracing::info!(user = %session.user.id, "signed in");
        self.client.set_session(Some(session.clone()))?;
        Ok(session)
    }

    /// Exchange the session's refresh token for a new session.
    pub async fn refresh(&self, session: &Session) -> Result<Session> {
        let body = json!({ "refresh_token": session.refresh_token });
        let refreshed = self
            .post::<Session>(TOKEN, &[("grant_type", "refresh_token")], &body)
            .await?
            .stamped();
        tracing::debug!(user = %refreshed.user.id, "session refreshed");
        self.client.set_session(Some(refreshed.clone()))?;
        Ok(refreshed)
    }

    /// Revoke the session remotely and forget it locally.
    ///
    /// The local session is cleared even when the remote call fails. An
    /// already-invalid token is not reported as an error.
    pub async fn sign_out(&self) -> Result<()> {
        if self.client.current_session().is_none() {
            return Ok(());
        }

        let remote = self
            .client
            .send(self.client.request(Method::POST, &["auth", "v1", "logout"]))
            .await;
        self.client.set_session(None)?;
        tracing::info!("signed out");

        match remote {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.status(), Some(401 | 403 | 404)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// The current session, refreshed first when its access token has
    /// expired. A rejected refresh token signs the user out.
    pub async fn session(&self) -> Result<Option<Session>> {
        let Some(session) = self.client.current_session() else {
            return Ok(None);
        };
        if !session.is_expired() {
            return Ok(Some(session));
        }

        match self.refresh(&session).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(e) if matches!(e.status(), Some(400 | 401 | 403)) => {
                tracing::warn!(error = %e, "refresh rejected; clearing session");
                self.client.set_session(None)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The current session, or [`Error::NotAuthenticated`].
    pub async fn require_session(&self) -> Result<Session> {
        self.session().await?.ok_or(Error::NotAuthenticated)
    }

    /// Fetch the signed-in user from the server.
    pub async fn user(&self) -> Result<User> {
        self.require_session().await?;
        let response = self
            .client
            .send(self.client.request(Method::GET, &["auth", "v1", "user"]))
            .await?;
        let value: Value = response.json().await?;
        decode(value)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
        body: &Value,
    ) -> Result<T> {
        let request = self
            .client
            .anon_request(Method::POST, path)
            .query(query)
            .json(body);
        let response = self.client.send(request).await?;
        let value: Value = response.json().await?;
        decode(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::decode(e.to_string()))
}
